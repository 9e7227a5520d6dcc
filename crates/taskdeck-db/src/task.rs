use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use taskdeck_core::models::{Task, TaskStatus};
use taskdeck_core::AppError;
use uuid::Uuid;

use crate::store::{NewTask, TaskFilter, TaskStore};

const TASK_COLUMNS: &str = "id, title, description, status, created_at, image_url";

#[derive(Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for TaskRepository {
    #[tracing::instrument(skip(self, task), fields(title_len = task.title.len()))]
    async fn insert_task(&self, task: NewTask) -> Result<Task, AppError> {
        let id = Uuid::new_v4();

        let sql = format!(
            r#"
            INSERT INTO tasks (id, title, description, status, image_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            TASK_COLUMNS
        );

        let task: Task = sqlx::query_as::<Postgres, Task>(&sql)
            .bind(id)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.status)
            .bind(&task.image_url)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, task_id = %id, "Failed to insert task");
                AppError::Database(e)
            })?;

        tracing::debug!(task_id = %task.id, status = %task.status, "Task inserted");

        Ok(task)
    }

    #[tracing::instrument(skip(self))]
    async fn get_task(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        let sql = format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS);

        let task = sqlx::query_as::<Postgres, Task>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(task)
    }

    #[tracing::instrument(skip(self))]
    async fn list_tasks(&self, filter: TaskFilter) -> Result<Vec<Task>, AppError> {
        let mut sql = format!("SELECT {} FROM tasks", TASK_COLUMNS);
        let mut bind_count = 1;

        if filter.status.is_some() {
            sql.push_str(&format!(" WHERE status = ${}", bind_count));
            bind_count += 1;
        }

        // id breaks created_at ties so pages never overlap or skip rows
        sql.push_str(&format!(
            " ORDER BY created_at ASC, id ASC LIMIT ${} OFFSET ${}",
            bind_count,
            bind_count + 1
        ));

        let mut query_builder = sqlx::query_as::<Postgres, Task>(&sql);

        if let Some(status) = filter.status {
            query_builder = query_builder.bind(status);
        }

        let tasks = query_builder
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(tasks)
    }

    #[tracing::instrument(skip(self))]
    async fn update_status(&self, id: Uuid, status: TaskStatus) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE tasks SET status = $1 WHERE id = $2")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self, image_url))]
    async fn set_image_url(&self, id: Uuid, image_url: &str) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE tasks SET image_url = $1 WHERE id = $2")
            .bind(image_url)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_task(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        let sql = format!("DELETE FROM tasks WHERE id = $1 RETURNING {}", TASK_COLUMNS);

        let deleted = sqlx::query_as::<Postgres, Task>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(deleted)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
