use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;

/// Lifecycle status of a task.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "task_status", rename_all = "kebab-case")
)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in-progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            _ => Err(AppError::Validation(format!(
                "Invalid task status '{}'. Must be one of: pending, in-progress, completed",
                s
            ))),
        }
    }
}

/// A persisted task.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    /// Reference to the task image in object storage
    pub image_url: Option<String>,
}

/// Request body for creating a task
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateTaskRequest {
    /// 1 to 255 characters after trimming surrounding whitespace
    pub title: String,
    /// Trimmed; blank or whitespace-only is stored as absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Defaults to `pending`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url(message = "image_url must be a valid URL"))]
    pub image_url: Option<String>,
}

impl CreateTaskRequest {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: None,
            image_url: None,
        }
    }
}

/// Request body for changing the status of a task
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateTaskStatusRequest {
    pub status: TaskStatus,
}

/// Request body for pointing a task at an uploaded image
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct AttachImageRequest {
    #[validate(url(message = "image_url must be a valid URL"))]
    pub image_url: String,
}

/// Query parameters for listing tasks
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TaskListQuery {
    /// Only return tasks with this status
    pub status: Option<TaskStatus>,
    /// 1-based page number (default 1)
    pub page: Option<u32>,
    /// Page size (default 10, capped at the configured maximum)
    pub limit: Option<u32>,
}

/// One page of tasks ordered by creation time
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
    /// Number of tasks on this page
    pub count: usize,
    pub page: u32,
    pub limit: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_kebab_case_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        let parsed: TaskStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(parsed, TaskStatus::Completed);
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(serde_json::from_str::<TaskStatus>("\"done\"").is_err());
        assert!(matches!(
            "in_progress".parse::<TaskStatus>(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn status_display_matches_parse() {
        for status in TaskStatus::ALL {
            assert_eq!(status.to_string().parse::<TaskStatus>().unwrap(), status);
        }
    }

    #[test]
    fn default_status_is_pending() {
        assert_eq!(TaskStatus::default(), TaskStatus::Pending);
    }

    #[test]
    fn create_request_rejects_bad_image_url() {
        let mut req = CreateTaskRequest::new("Buy milk");
        assert!(req.validate().is_ok());
        req.image_url = Some("not a url".to_string());
        assert!(req.validate().is_err());
    }

    #[test]
    fn title_length_is_left_to_the_trimming_check() {
        let padded = format!("  {}", "x".repeat(254));
        assert!(CreateTaskRequest::new(padded).validate().is_ok());
    }

    #[test]
    fn create_request_omits_absent_fields() {
        let body = serde_json::to_value(CreateTaskRequest::new("Buy milk")).unwrap();
        assert_eq!(body, serde_json::json!({ "title": "Buy milk" }));
    }
}
