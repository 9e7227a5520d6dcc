//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use taskdeck_core::Config;
use taskdeck_db::TaskRepository;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration, before any connection is attempted
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.log_format())
        .context("Failed to initialize telemetry")?;

    tracing::info!(
        environment = %config.environment(),
        image_url_mode = %config.image_url_mode(),
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;
    let storage = storage::setup_storage(&config)?;

    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::new(TaskRepository::new(pool)),
        storage,
    ));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
