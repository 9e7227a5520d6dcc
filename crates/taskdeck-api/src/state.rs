//! Application state shared by every handler.

use std::sync::Arc;

use taskdeck_core::Config;
use taskdeck_db::TaskStore;
use taskdeck_storage::Storage;

use crate::services::{TaskService, UploadConfirmer, UploadIssuer};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub tasks: TaskService,
    pub upload_issuer: UploadIssuer,
    pub upload_confirmer: UploadConfirmer,
    /// Kept for health checks; uploads go through the issuer and confirmer
    pub storage: Arc<dyn Storage>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn TaskStore>, storage: Arc<dyn Storage>) -> Self {
        let tasks = TaskService::new(store, &config);
        let upload_issuer = UploadIssuer::new(storage.clone(), &config);
        let upload_confirmer = UploadConfirmer::new(storage.clone(), tasks.clone(), &config);

        Self {
            config,
            tasks,
            upload_issuer,
            upload_confirmer,
            storage,
        }
    }
}
