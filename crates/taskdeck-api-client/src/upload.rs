//! Client side of the direct-to-storage upload flow.
//!
//! Three round-trips: request a credential from the API, `PUT` the bytes to the
//! pre-signed URL, then confirm with the API. Each step advances an [`UploadState`];
//! a failure reports the step that failed. Nothing is retried.

use std::path::Path;

use anyhow::{Context, Result};
use reqwest::header::CONTENT_TYPE;
use sha2::{Digest, Sha256};
use taskdeck_core::models::{
    ConfirmUploadRequest, ConfirmUploadResponse, CreateTaskRequest, Task, UploadState,
};
use uuid::Uuid;

use crate::ApiClient;

/// Upload flow failure. `stage` is the state the flow was trying to reach.
#[derive(Debug, thiserror::Error)]
#[error("upload failed at {stage}: {message}")]
pub struct UploadFlowError {
    pub stage: UploadState,
    pub message: String,
}

impl UploadFlowError {
    fn at(stage: UploadState, err: impl std::fmt::Display) -> Self {
        Self {
            stage,
            message: err.to_string(),
        }
    }
}

/// Image bytes plus the metadata the credential request needs.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl ImageUpload {
    /// Read an image file, inferring the content type from its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("Invalid file name: {}", path.display()))?
            .to_string();
        let content_type = content_type_for(path)
            .with_context(|| format!("Unsupported image type: {}", path.display()))?;
        let data =
            std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;

        Ok(Self {
            filename,
            content_type: content_type.to_string(),
            data,
        })
    }
}

/// Content type for the image extensions the API accepts by default.
pub fn content_type_for(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

struct UploadFlow {
    state: UploadState,
}

impl UploadFlow {
    fn new() -> Self {
        Self {
            state: UploadState::NoImage,
        }
    }

    fn advance(&mut self, next: UploadState) -> Result<(), UploadFlowError> {
        self.state = self
            .state
            .advance(next)
            .map_err(|e| UploadFlowError::at(next, e))?;
        Ok(())
    }
}

impl ApiClient {
    /// Run the full upload flow, attaching the image to `task_id` when given.
    ///
    /// The SHA-256 of `image.data` is sent with the confirmation so the server can
    /// verify what reached the bucket.
    pub async fn upload_image(
        &self,
        image: &ImageUpload,
        task_id: Option<Uuid>,
    ) -> Result<ConfirmUploadResponse, UploadFlowError> {
        let mut flow = UploadFlow::new();

        let credential = self
            .request_upload_credential(&image.filename, &image.content_type)
            .await
            .map_err(|e| UploadFlowError::at(UploadState::CredentialRequested, e))?;
        flow.advance(UploadState::CredentialRequested)?;
        tracing::debug!(object_key = %credential.object_key, "Upload credential received");

        let response = self
            .client()
            .request(
                credential
                    .method
                    .parse()
                    .map_err(|e| UploadFlowError::at(UploadState::BytesTransferred, e))?,
                &credential.upload_url,
            )
            .header(CONTENT_TYPE, &credential.content_type)
            .body(image.data.clone())
            .send()
            .await
            .map_err(|e| UploadFlowError::at(UploadState::BytesTransferred, e))?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(UploadFlowError::at(
                UploadState::BytesTransferred,
                format!("storage responded with status {}: {}", status, body),
            ));
        }
        flow.advance(UploadState::BytesTransferred)?;
        tracing::debug!(object_key = %credential.object_key, bytes = image.data.len(), "Bytes transferred");

        let confirmed = self
            .confirm_upload(&ConfirmUploadRequest {
                object_key: credential.object_key,
                task_id,
                sha256: Some(hex::encode(Sha256::digest(&image.data))),
            })
            .await
            .map_err(|e| UploadFlowError::at(UploadState::Confirmed, e))?;
        flow.advance(UploadState::Confirmed)?;

        Ok(confirmed)
    }

    /// Create a task, then upload its image. The task is created first: if the
    /// upload fails the task stays, without an image, and the error names it.
    pub async fn create_task_with_image(
        &self,
        request: &CreateTaskRequest,
        image: &ImageUpload,
    ) -> Result<Task> {
        let mut task = self.create_task(request).await?;

        let confirmed = self
            .upload_image(image, Some(task.id))
            .await
            .with_context(|| format!("Task {} was created without its image", task.id))?;

        task.image_url = Some(confirmed.image_url);
        Ok(task)
    }
}
