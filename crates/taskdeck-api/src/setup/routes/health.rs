//! Health check handlers.

use crate::constants::READINESS_TIMEOUT_SECS;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Run an async check with timeout; returns "healthy", "timeout", or "{prefix}: {error}".
async fn run_check<F, E>(timeout: Duration, f: F, error_prefix: &str) -> String
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match tokio::time::timeout(timeout, f).await {
        Ok(Ok(())) => "healthy".to_string(),
        Ok(Err(e)) => format!("{}: {}", error_prefix, e),
        Err(_) => "timeout".to_string(),
    }
}

#[derive(Serialize)]
pub(super) struct ReadinessResponse {
    pub status: String,
    pub database: String,
    pub storage: String,
}

/// Liveness check: the process is running.
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Readiness check. The database gates readiness; storage only degrades it, since
/// task routes keep working without it.
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timeout = Duration::from_secs(READINESS_TIMEOUT_SECS);

    let database = run_check(timeout, state.tasks.ping(), "unavailable").await;
    let storage = run_check(
        timeout,
        async {
            state
                .storage
                .exists("health-check-non-existent-key")
                .await
                .map(drop)
        },
        "degraded",
    )
    .await;

    let ready = database == "healthy";
    if !ready {
        tracing::error!(database = %database, "Readiness check failed");
    } else if storage != "healthy" {
        tracing::warn!(storage = %storage, "Storage health check failed");
    }

    let response = ReadinessResponse {
        status: if ready { "ready" } else { "not_ready" }.to_string(),
        database,
        storage,
    };
    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
