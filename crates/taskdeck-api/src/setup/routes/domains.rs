//! Versioned API route groups.

use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::routing::{get, patch, post, put};
use axum::Router;
use std::sync::Arc;

pub fn task_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/tasks", API_PREFIX),
            post(handlers::tasks::create_task).get(handlers::tasks::list_tasks),
        )
        .route(
            &format!("{}/tasks/{{id}}", API_PREFIX),
            get(handlers::tasks::get_task).delete(handlers::tasks::delete_task),
        )
        .route(
            &format!("{}/tasks/{{id}}/status", API_PREFIX),
            patch(handlers::tasks::update_task_status),
        )
        .route(
            &format!("{}/tasks/{{id}}/image", API_PREFIX),
            put(handlers::tasks::attach_image),
        )
}

pub fn upload_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/uploads/presigned", API_PREFIX),
            post(handlers::uploads::request_upload_credential),
        )
        .route(
            &format!("{}/uploads/complete", API_PREFIX),
            post(handlers::uploads::confirm_upload),
        )
}
