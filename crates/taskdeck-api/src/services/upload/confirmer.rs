use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use sha2::{Digest, Sha256};
use taskdeck_core::models::{ConfirmUploadRequest, ConfirmUploadResponse};
use taskdeck_core::validation::validate_sha256_hex;
use taskdeck_core::{AppError, Config, ImageUrlMode};
use taskdeck_storage::{validate_object_key, Storage};

use crate::services::TaskService;

/// Confirms finished direct uploads and derives the image reference.
#[derive(Clone)]
pub struct UploadConfirmer {
    storage: Arc<dyn Storage>,
    tasks: TaskService,
    max_image_size_bytes: u64,
    url_mode: ImageUrlMode,
    download_ttl: Duration,
}

impl UploadConfirmer {
    pub fn new(storage: Arc<dyn Storage>, tasks: TaskService, config: &Config) -> Self {
        Self {
            storage,
            tasks,
            max_image_size_bytes: config.max_image_size_bytes(),
            url_mode: config.image_url_mode(),
            download_ttl: Duration::from_secs(config.download_url_ttl_secs()),
        }
    }

    /// Check the object, optionally verify its digest, and attach the resulting
    /// reference to `task_id` when given. Nothing is written unless every check passes.
    #[tracing::instrument(
        skip(self, request),
        fields(object_key = %request.object_key, task_id = ?request.task_id, operation = "confirm_upload")
    )]
    pub async fn confirm(
        &self,
        request: ConfirmUploadRequest,
    ) -> Result<ConfirmUploadResponse, AppError> {
        let key = request.object_key.as_str();
        validate_object_key(key)?;
        let expected_digest = request
            .sha256
            .as_deref()
            .map(validate_sha256_hex)
            .transpose()?;

        if let Some(task_id) = request.task_id {
            // Fail before touching storage when the task is already gone
            self.tasks.get_task(task_id).await?;
        }

        let size = self.storage.content_length(key).await?;
        if size > self.max_image_size_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "Uploaded image is {} bytes; the limit is {} bytes",
                size, self.max_image_size_bytes
            )));
        }

        match expected_digest {
            Some(expected) => {
                let data = self.storage.download(key).await?;
                // The object may have been replaced since the size check
                let downloaded = data.len() as u64;
                if downloaded > self.max_image_size_bytes {
                    return Err(AppError::PayloadTooLarge(format!(
                        "Uploaded image is {} bytes; the limit is {} bytes",
                        downloaded, self.max_image_size_bytes
                    )));
                }
                let actual = hex::encode(Sha256::digest(&data));
                if actual != expected {
                    return Err(AppError::Validation(
                        "Uploaded object does not match the supplied sha256".to_string(),
                    ));
                }
                tracing::debug!("Upload integrity verified");
            }
            None => tracing::debug!("No sha256 supplied, upload integrity unchecked"),
        }

        let (image_url, expires_at) = match self.url_mode {
            ImageUrlMode::Public => (self.storage.public_url(key), None),
            ImageUrlMode::Signed => {
                let expires_at = Utc::now()
                    + chrono::Duration::seconds(
                        i64::try_from(self.download_ttl.as_secs()).unwrap_or(i64::MAX),
                    );
                let url = self
                    .storage
                    .presigned_get_url(key, self.download_ttl)
                    .await?;
                (url, Some(expires_at))
            }
        };

        if let Some(task_id) = request.task_id {
            self.tasks.attach_image(task_id, &image_url).await?;
        }

        tracing::info!(size, url_mode = %self.url_mode, "Upload confirmed");

        Ok(ConfirmUploadResponse {
            image_url,
            object_key: request.object_key,
            task_id: request.task_id,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_config;
    use taskdeck_core::models::CreateTaskRequest;
    use taskdeck_db::test_helpers::InMemoryTaskStore;
    use taskdeck_storage::test_helpers::{MockStorage, MOCK_BASE_URL};
    use uuid::Uuid;

    const KEY: &str = "uploads/0b6f3c1e-cat.png";

    struct Fixture {
        confirmer: UploadConfirmer,
        tasks: TaskService,
        storage: MockStorage,
    }

    fn fixture(overrides: &[(&str, &str)]) -> Fixture {
        let config = test_config(overrides);
        let storage = MockStorage::new();
        let tasks = TaskService::new(Arc::new(InMemoryTaskStore::new()), &config);
        let confirmer = UploadConfirmer::new(Arc::new(storage.clone()), tasks.clone(), &config);
        Fixture {
            confirmer,
            tasks,
            storage,
        }
    }

    fn confirm_request(task_id: Option<Uuid>, sha256: Option<String>) -> ConfirmUploadRequest {
        ConfirmUploadRequest {
            object_key: KEY.to_string(),
            task_id,
            sha256,
        }
    }

    #[tokio::test]
    async fn public_mode_attaches_a_permanent_url() {
        let fx = fixture(&[]);
        let task = fx
            .tasks
            .create_task(CreateTaskRequest::new("Buy milk"))
            .await
            .unwrap();
        fx.storage.put_object(KEY, b"png bytes".to_vec());

        let confirmed = fx
            .confirmer
            .confirm(confirm_request(Some(task.id), None))
            .await
            .unwrap();

        assert_eq!(
            confirmed.image_url,
            format!("{}/test-bucket/{}", MOCK_BASE_URL, KEY)
        );
        assert!(confirmed.expires_at.is_none());
        let stored = fx.tasks.get_task(task.id).await.unwrap();
        assert_eq!(stored.image_url.as_deref(), Some(confirmed.image_url.as_str()));
    }

    #[tokio::test]
    async fn signed_mode_reports_an_expiry() {
        let fx = fixture(&[("IMAGE_URL_MODE", "signed"), ("DOWNLOAD_URL_TTL_SECS", "3600")]);
        fx.storage.put_object(KEY, b"png bytes".to_vec());

        let confirmed = fx.confirmer.confirm(confirm_request(None, None)).await.unwrap();

        assert!(confirmed.image_url.contains("X-Amz-Expires=3600"));
        assert!(confirmed.expires_at.is_some_and(|at| at > Utc::now()));
    }

    #[tokio::test]
    async fn missing_object_is_not_found_and_task_is_untouched() {
        let fx = fixture(&[]);
        let task = fx
            .tasks
            .create_task(CreateTaskRequest::new("Buy milk"))
            .await
            .unwrap();

        let err = fx
            .confirmer
            .confirm(confirm_request(Some(task.id), None))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert!(fx.tasks.get_task(task.id).await.unwrap().image_url.is_none());
    }

    #[tokio::test]
    async fn oversized_object_is_rejected_and_left_in_place() {
        let fx = fixture(&[("MAX_IMAGE_SIZE_MB", "1")]);
        fx.storage.put_object(KEY, vec![0u8; 1024 * 1024 + 1]);

        let err = fx.confirmer.confirm(confirm_request(None, None)).await.unwrap_err();

        assert!(matches!(err, AppError::PayloadTooLarge(_)));
        assert!(fx.storage.has_object(KEY));
    }

    #[tokio::test]
    async fn object_grown_after_size_check_is_rejected_on_download() {
        let fx = fixture(&[("MAX_IMAGE_SIZE_MB", "1")]);
        let oversized = vec![0u8; 2 * 1024 * 1024];
        let digest = hex::encode(Sha256::digest(&oversized));
        fx.storage.put_object(KEY, oversized);
        fx.storage.report_content_length(KEY, 1024);

        let err = fx
            .confirmer
            .confirm(confirm_request(None, Some(digest)))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::PayloadTooLarge(_)));
    }

    #[tokio::test]
    async fn digest_mismatch_is_a_validation_error() {
        let fx = fixture(&[]);
        fx.storage.put_object(KEY, b"png bytes".to_vec());

        let wrong = hex::encode(Sha256::digest(b"other bytes"));
        let err = fx
            .confirmer
            .confirm(confirm_request(None, Some(wrong)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let right = hex::encode(Sha256::digest(b"png bytes")).to_uppercase();
        fx.confirmer
            .confirm(confirm_request(None, Some(right)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn foreign_keys_are_rejected_before_storage() {
        let fx = fixture(&[]);
        let err = fx
            .confirmer
            .confirm(ConfirmUploadRequest {
                object_key: "uploads/../secrets.txt".to_string(),
                task_id: None,
                sha256: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn unknown_task_is_not_found() {
        let fx = fixture(&[]);
        fx.storage.put_object(KEY, b"png bytes".to_vec());
        let err = fx
            .confirmer
            .confirm(confirm_request(Some(Uuid::new_v4()), None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
