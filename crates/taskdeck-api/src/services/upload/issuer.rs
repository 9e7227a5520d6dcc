use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use taskdeck_core::models::{UploadCredential, UploadCredentialRequest};
use taskdeck_core::validation::{validate_content_type, validate_filename};
use taskdeck_core::{AppError, Config};
use taskdeck_storage::{generate_object_key, Storage};
use validator::Validate;

/// Issues upload credentials: one object key and one pre-signed PUT URL per request.
#[derive(Clone)]
pub struct UploadIssuer {
    storage: Arc<dyn Storage>,
    allowed_content_types: Vec<String>,
    ttl: Duration,
}

impl UploadIssuer {
    pub fn new(storage: Arc<dyn Storage>, config: &Config) -> Self {
        Self {
            storage,
            allowed_content_types: config.allowed_image_content_types().to_vec(),
            ttl: Duration::from_secs(config.upload_url_ttl_secs()),
        }
    }

    #[tracing::instrument(
        skip(self, request),
        fields(content_type = %request.content_type, operation = "request_upload_credential")
    )]
    pub async fn request_credential(
        &self,
        request: UploadCredentialRequest,
    ) -> Result<UploadCredential, AppError> {
        request.validate()?;
        validate_filename(&request.filename)?;
        let content_type =
            validate_content_type(&request.content_type, &self.allowed_content_types)?;

        let object_key = generate_object_key(&request.filename);

        // Taken before signing so the reported expiry is never later than the real one
        let expires_at = Utc::now()
            + chrono::Duration::seconds(i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX));

        let upload_url = self
            .storage
            .presigned_put_url(&object_key, &content_type, self.ttl)
            .await?;

        tracing::info!(
            bucket = %self.storage.bucket(),
            object_key = %object_key,
            expires_in_secs = self.ttl.as_secs(),
            "Upload credential issued"
        );

        Ok(UploadCredential {
            upload_url,
            method: "PUT".to_string(),
            object_key,
            content_type,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_config;
    use taskdeck_storage::test_helpers::MockStorage;
    use taskdeck_storage::validate_object_key;

    fn issuer(storage: &MockStorage) -> UploadIssuer {
        UploadIssuer::new(Arc::new(storage.clone()), &test_config(&[]))
    }

    fn request(filename: &str, content_type: &str) -> UploadCredentialRequest {
        UploadCredentialRequest {
            filename: filename.to_string(),
            content_type: content_type.to_string(),
        }
    }

    #[tokio::test]
    async fn credential_targets_a_fresh_valid_key() {
        let storage = MockStorage::new();
        let issuer = issuer(&storage);

        let first = issuer
            .request_credential(request("cat photo.PNG", "image/png"))
            .await
            .unwrap();
        let second = issuer
            .request_credential(request("cat photo.PNG", "image/png"))
            .await
            .unwrap();

        assert_ne!(first.object_key, second.object_key);
        validate_object_key(&first.object_key).unwrap();
        assert!(first.upload_url.contains(&first.object_key));
        assert!(first.upload_url.contains("X-Amz-Expires=900"));
        assert_eq!(first.method, "PUT");
        assert!(first.expires_at > Utc::now());
        // Issuing a credential stores nothing
        assert_eq!(storage.object_count(), 0);
    }

    #[tokio::test]
    async fn content_type_is_normalized() {
        let storage = MockStorage::new();
        let credential = issuer(&storage)
            .request_credential(request("a.jpg", "IMAGE/JPEG; charset=binary"))
            .await
            .unwrap();
        assert_eq!(credential.content_type, "image/jpeg");
    }

    #[tokio::test]
    async fn disallowed_content_type_never_reaches_storage() {
        let storage = MockStorage::new();
        let err = issuer(&storage)
            .request_credential(request("notes.pdf", "application/pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(storage.presign_calls(), 0);
    }

    #[tokio::test]
    async fn rejected_service_credentials_surface_as_upstream_auth() {
        let storage = MockStorage::new();
        storage.reject_credentials(true);
        let err = issuer(&storage)
            .request_credential(request("a.png", "image/png"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UpstreamAuth(_)));
    }
}
