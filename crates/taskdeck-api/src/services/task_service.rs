//! Task Service
//!
//! Business rules on top of the Task Store: title normalization, status defaults,
//! page/limit resolution, and mapping "no such row" onto `AppError::NotFound`.

use std::sync::Arc;

use taskdeck_core::models::{CreateTaskRequest, Task, TaskListQuery, TaskListResponse, TaskStatus};
use taskdeck_core::validation::validate_title;
use taskdeck_core::{AppError, Config};
use taskdeck_db::{NewTask, TaskFilter, TaskStore};
use uuid::Uuid;
use validator::Validate;

#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
    default_page_size: u32,
    max_page_size: u32,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>, config: &Config) -> Self {
        Self {
            store,
            default_page_size: config.default_page_size(),
            max_page_size: config.max_page_size(),
        }
    }

    #[tracing::instrument(skip(self, request), fields(operation = "create_task"))]
    pub async fn create_task(&self, request: CreateTaskRequest) -> Result<Task, AppError> {
        request.validate()?;
        let title = validate_title(&request.title)?;

        let description = request
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        let task = self
            .store
            .insert_task(NewTask {
                title,
                description,
                status: request.status.unwrap_or_default(),
                image_url: request.image_url,
            })
            .await?;

        tracing::info!(task_id = %task.id, status = %task.status, "Task created");
        Ok(task)
    }

    /// One page of tasks in creation order. Missing `page`/`limit` fall back to
    /// 1 and the configured default; `limit` is clamped to the configured maximum.
    #[tracing::instrument(skip(self), fields(operation = "list_tasks"))]
    pub async fn list_tasks(&self, query: TaskListQuery) -> Result<TaskListResponse, AppError> {
        let page = query.page.unwrap_or(1);
        if page < 1 {
            return Err(AppError::Validation("page must be at least 1".to_string()));
        }

        let limit = query.limit.unwrap_or(self.default_page_size);
        if limit < 1 {
            return Err(AppError::Validation("limit must be at least 1".to_string()));
        }
        let limit = limit.min(self.max_page_size);

        let offset = (i64::from(page) - 1) * i64::from(limit);
        let tasks = self
            .store
            .list_tasks(TaskFilter {
                status: query.status,
                limit: i64::from(limit),
                offset,
            })
            .await?;

        Ok(TaskListResponse {
            count: tasks.len(),
            tasks,
            page,
            limit,
        })
    }

    pub async fn get_task(&self, id: Uuid) -> Result<Task, AppError> {
        self.store
            .get_task(id)
            .await?
            .ok_or_else(|| task_not_found(id))
    }

    #[tracing::instrument(skip(self), fields(operation = "update_task_status"))]
    pub async fn update_task_status(&self, id: Uuid, status: TaskStatus) -> Result<(), AppError> {
        if !self.store.update_status(id, status).await? {
            return Err(task_not_found(id));
        }
        tracing::info!(task_id = %id, status = %status, "Task status updated");
        Ok(())
    }

    /// Point a task at an image. The URL is stored as given; storage is not consulted.
    #[tracing::instrument(skip(self, image_url), fields(operation = "attach_image"))]
    pub async fn attach_image(&self, id: Uuid, image_url: &str) -> Result<(), AppError> {
        if !self.store.set_image_url(id, image_url).await? {
            return Err(task_not_found(id));
        }
        tracing::info!(task_id = %id, "Image attached to task");
        Ok(())
    }

    /// Idempotent: deleting an unknown id succeeds without effect.
    #[tracing::instrument(skip(self), fields(operation = "delete_task"))]
    pub async fn delete_task(&self, id: Uuid) -> Result<(), AppError> {
        match self.store.delete_task(id).await? {
            Some(task) => {
                if let Some(image_url) = task.image_url {
                    // Orphan cleanup is out of scope; the object stays in the bucket
                    tracing::info!(task_id = %id, image_url = %image_url, "Task deleted, image left in storage");
                } else {
                    tracing::info!(task_id = %id, "Task deleted");
                }
            }
            None => tracing::debug!(task_id = %id, "Delete of unknown task ignored"),
        }
        Ok(())
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.store.ping().await
    }
}

fn task_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Task {} not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_config;
    use taskdeck_db::test_helpers::InMemoryTaskStore;

    fn service() -> (TaskService, InMemoryTaskStore) {
        let store = InMemoryTaskStore::new();
        let service = TaskService::new(Arc::new(store.clone()), &test_config(&[]));
        (service, store)
    }

    fn query(page: Option<u32>, limit: Option<u32>) -> TaskListQuery {
        TaskListQuery {
            status: None,
            page,
            limit,
        }
    }

    #[tokio::test]
    async fn create_trims_title_and_defaults_to_pending() {
        let (service, _) = service();
        let task = service
            .create_task(CreateTaskRequest::new("  Buy milk  "))
            .await
            .unwrap();
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.status, TaskStatus::Pending);
    }

    #[tokio::test]
    async fn title_limit_applies_after_trimming() {
        let (service, _) = service();
        let padded = format!("  {}  ", "x".repeat(255));
        let task = service
            .create_task(CreateTaskRequest::new(padded))
            .await
            .unwrap();
        assert_eq!(task.title.chars().count(), 255);

        let err = service
            .create_task(CreateTaskRequest::new("x".repeat(256)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn blank_description_is_stored_as_absent() {
        let (service, _) = service();
        let task = service
            .create_task(CreateTaskRequest {
                description: Some("   ".to_string()),
                ..CreateTaskRequest::new("Buy milk")
            })
            .await
            .unwrap();
        assert!(task.description.is_none());
    }

    #[tokio::test]
    async fn whitespace_title_is_rejected_before_the_store() {
        let (service, store) = service();
        let err = service
            .create_task(CreateTaskRequest::new("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn list_defaults_and_clamps_the_window() {
        let (service, _) = service();
        for i in 0..12 {
            service
                .create_task(CreateTaskRequest::new(format!("task {}", i)))
                .await
                .unwrap();
        }

        let first = service.list_tasks(query(None, None)).await.unwrap();
        assert_eq!((first.page, first.limit, first.count), (1, 10, 10));

        let second = service.list_tasks(query(Some(2), None)).await.unwrap();
        assert_eq!(second.count, 2);
        assert_eq!(second.tasks[0].title, "task 10");

        let clamped = service.list_tasks(query(None, Some(10_000))).await.unwrap();
        assert_eq!(clamped.limit, 100);
        assert_eq!(clamped.count, 12);
    }

    #[tokio::test]
    async fn zero_page_or_limit_is_a_validation_error() {
        let (service, _) = service();
        assert!(matches!(
            service.list_tasks(query(Some(0), None)).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            service.list_tasks(query(None, Some(0))).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn updates_on_unknown_task_are_not_found() {
        let (service, _) = service();
        let missing = Uuid::new_v4();
        assert!(matches!(
            service
                .update_task_status(missing, TaskStatus::Completed)
                .await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.attach_image(missing, "https://x/y.png").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.get_task(missing).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (service, store) = service();
        let task = service
            .create_task(CreateTaskRequest::new("Buy milk"))
            .await
            .unwrap();
        service.delete_task(task.id).await.unwrap();
        service.delete_task(task.id).await.unwrap();
        assert!(store.is_empty());
    }
}
