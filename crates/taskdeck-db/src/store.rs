//! Task Store trait abstraction
//!
//! Every method is a single-row (or single-statement) operation, so a failed call
//! never leaves a partial write behind.

use async_trait::async_trait;
use taskdeck_core::models::{Task, TaskStatus};
use taskdeck_core::AppError;
use uuid::Uuid;

/// Fields supplied by the caller when inserting a task. `id` and `created_at`
/// are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub image_url: Option<String>,
}

/// Filter and window for listing tasks
#[derive(Debug, Clone, Copy)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub limit: i64,
    pub offset: i64,
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Insert a task with a fresh id and a store-assigned creation timestamp
    async fn insert_task(&self, task: NewTask) -> Result<Task, AppError>;

    async fn get_task(&self, id: Uuid) -> Result<Option<Task>, AppError>;

    /// Tasks matching the filter ordered by `(created_at, id)` ascending
    async fn list_tasks(&self, filter: TaskFilter) -> Result<Vec<Task>, AppError>;

    /// Returns false when no task has this id
    async fn update_status(&self, id: Uuid, status: TaskStatus) -> Result<bool, AppError>;

    /// Returns false when no task has this id
    async fn set_image_url(&self, id: Uuid, image_url: &str) -> Result<bool, AppError>;

    /// Hard delete; returns the removed row, or `None` when no task had this id
    async fn delete_task(&self, id: Uuid) -> Result<Option<Task>, AppError>;

    /// Cheap connectivity check for readiness probes
    async fn ping(&self) -> Result<(), AppError>;
}
