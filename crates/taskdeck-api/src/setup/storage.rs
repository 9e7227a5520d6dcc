//! Storage setup

use anyhow::{Context, Result};
use std::sync::Arc;
use taskdeck_core::Config;
use taskdeck_storage::{create_storage, Storage};

pub fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    let storage = create_storage(config).context("Failed to initialize object storage")?;

    tracing::info!(
        upload_url_ttl_secs = config.upload_url_ttl_secs(),
        max_image_size_bytes = config.max_image_size_bytes(),
        allowed_content_types = %config.allowed_image_content_types().join(","),
        "Upload flow configured"
    );

    Ok(storage)
}
