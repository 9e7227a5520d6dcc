//! Typed task and upload endpoints.

use crate::{ApiClient, API_PREFIX};
use anyhow::Result;
use serde_json::json;
use taskdeck_core::models::{
    ConfirmUploadRequest, ConfirmUploadResponse, CreateTaskRequest, Task, TaskListResponse,
    TaskStatus, UploadCredential, UploadCredentialRequest,
};
use uuid::Uuid;

impl ApiClient {
    pub async fn create_task(&self, request: &CreateTaskRequest) -> Result<Task> {
        self.post_json(&format!("{}/tasks", API_PREFIX), request)
            .await
    }

    /// List tasks, optionally filtered by status. Unset `page`/`limit` use the server defaults.
    pub async fn list_tasks(
        &self,
        status: Option<TaskStatus>,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<TaskListResponse> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(s) = status {
            query.push(("status", s.to_string()));
        }
        if let Some(p) = page {
            query.push(("page", p.to_string()));
        }
        if let Some(l) = limit {
            query.push(("limit", l.to_string()));
        }

        self.get(&format!("{}/tasks", API_PREFIX), &query).await
    }

    pub async fn get_task(&self, id: Uuid) -> Result<Task> {
        self.get(&format!("{}/tasks/{}", API_PREFIX, id), &[])
            .await
    }

    pub async fn update_task_status(&self, id: Uuid, status: TaskStatus) -> Result<()> {
        self.patch_json(
            &format!("{}/tasks/{}/status", API_PREFIX, id),
            &json!({ "status": status }),
        )
        .await
    }

    pub async fn attach_image(&self, id: Uuid, image_url: &str) -> Result<()> {
        self.put_json(
            &format!("{}/tasks/{}/image", API_PREFIX, id),
            &json!({ "image_url": image_url }),
        )
        .await
    }

    pub async fn delete_task(&self, id: Uuid) -> Result<()> {
        self.delete(&format!("{}/tasks/{}", API_PREFIX, id))
            .await
    }

    pub async fn request_upload_credential(
        &self,
        filename: &str,
        content_type: &str,
    ) -> Result<UploadCredential> {
        let request = UploadCredentialRequest {
            filename: filename.to_string(),
            content_type: content_type.to_string(),
        };
        self.post_json(&format!("{}/uploads/presigned", API_PREFIX), &request)
            .await
    }

    pub async fn confirm_upload(
        &self,
        request: &ConfirmUploadRequest,
    ) -> Result<ConfirmUploadResponse> {
        self.post_json(&format!("{}/uploads/complete", API_PREFIX), request)
            .await
    }
}
