//! Taskdeck API
//!
//! HTTP service for tasks and their images. Image bytes never pass through this
//! process: clients upload straight to object storage with a pre-signed URL and
//! then confirm the upload here.

pub mod api_doc;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;

pub use setup::routes::setup_routes;
pub use state::AppState;
