//! In-memory TaskStore for tests

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use taskdeck_core::models::{Task, TaskStatus};
use taskdeck_core::AppError;
use uuid::Uuid;

use crate::store::{NewTask, TaskFilter, TaskStore};

/// TaskStore backed by a `Vec`, with the same ordering and paging rules as Postgres.
#[derive(Clone, Default)]
pub struct InMemoryTaskStore {
    tasks: Arc<Mutex<Vec<Task>>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail as if the database were down
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.tasks().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn tasks(&self) -> MutexGuard<'_, Vec<Task>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_available(&self) -> Result<(), AppError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    fn with_task<F>(&self, id: Uuid, f: F) -> Result<bool, AppError>
    where
        F: FnOnce(&mut Task),
    {
        self.check_available()?;
        let mut tasks = self.tasks();
        match tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                f(task);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn insert_task(&self, task: NewTask) -> Result<Task, AppError> {
        self.check_available()?;
        let mut tasks = self.tasks();
        // Strictly increasing, so insertion order is the listing order
        let created_at = match tasks.iter().map(|t| t.created_at).max() {
            Some(last) => Utc::now().max(last + Duration::microseconds(1)),
            None => Utc::now(),
        };
        let task = Task {
            id: Uuid::new_v4(),
            title: task.title,
            description: task.description,
            status: task.status,
            created_at,
            image_url: task.image_url,
        };
        tasks.push(task.clone());
        Ok(task)
    }

    async fn get_task(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        self.check_available()?;
        Ok(self.tasks().iter().find(|t| t.id == id).cloned())
    }

    async fn list_tasks(&self, filter: TaskFilter) -> Result<Vec<Task>, AppError> {
        self.check_available()?;
        let mut matching: Vec<Task> = self
            .tasks()
            .iter()
            .filter(|t| filter.status.map_or(true, |s| t.status == s))
            .cloned()
            .collect();
        matching.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));

        Ok(matching
            .into_iter()
            .skip(filter.offset.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .collect())
    }

    async fn update_status(&self, id: Uuid, status: TaskStatus) -> Result<bool, AppError> {
        self.with_task(id, |task| task.status = status)
    }

    async fn set_image_url(&self, id: Uuid, image_url: &str) -> Result<bool, AppError> {
        self.with_task(id, |task| task.image_url = Some(image_url.to_string()))
    }

    async fn delete_task(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        self.check_available()?;
        let mut tasks = self.tasks();
        Ok(tasks
            .iter()
            .position(|t| t.id == id)
            .map(|index| tasks.remove(index)))
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check_available()
    }
}
