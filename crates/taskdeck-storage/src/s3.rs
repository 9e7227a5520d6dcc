use crate::traits::{Storage, StorageError, StorageResult};
use async_trait::async_trait;
use http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::signer::Signer;
use object_store::Error as ObjectStoreError;
use object_store::{ObjectStoreExt, Result as ObjectResult};
use std::time::Duration;

/// S3 storage implementation
///
/// Works against AWS S3 and S3-compatible providers (Backblaze B2, MinIO) through
/// `object_store`. Credentials come from the standard `AWS_*` environment variables.
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
    region: String,
    endpoint_url: Option<String>,
    public_base_url: Option<String>,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - Bucket name
    /// * `region` - Region identifier (for B2: e.g. `us-west-004`)
    /// * `endpoint_url` - Optional custom endpoint for S3-compatible providers
    ///   (e.g. `https://s3.us-west-004.backblazeb2.com`, `http://localhost:9000` for MinIO)
    /// * `public_base_url` - Optional prefix for public object URLs (CDN or friendly domain)
    pub fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        public_base_url: Option<String>,
    ) -> StorageResult<Self> {
        Self::from_builder(
            AmazonS3Builder::from_env(),
            bucket,
            region,
            endpoint_url,
            public_base_url,
        )
    }

    fn from_builder(
        builder: AmazonS3Builder,
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        public_base_url: Option<String>,
    ) -> StorageResult<Self> {
        let mut builder = builder
            .with_region(region.clone())
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage {
            store,
            bucket,
            region,
            endpoint_url: endpoint_url.map(|e| e.trim_end_matches('/').to_string()),
            public_base_url: public_base_url.map(|u| u.trim_end_matches('/').to_string()),
        })
    }

    async fn sign(&self, method: Method, key: &str, expires_in: Duration) -> StorageResult<String> {
        let location = Path::from(key.to_string());
        let url_result: ObjectResult<_> = self
            .store
            .signed_url(method.clone(), &location, expires_in)
            .await;

        // Signing is local; the only failure is obtaining credentials.
        let url = url_result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                method = %method,
                "Failed to sign S3 URL"
            );
            StorageError::AuthFailed(e.to_string())
        })?;

        Ok(url.to_string())
    }

    fn map_request_error(&self, key: &str, err: ObjectStoreError) -> StorageError {
        match err {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(key.to_string()),
            ObjectStoreError::Unauthenticated { .. } | ObjectStoreError::PermissionDenied { .. } => {
                tracing::error!(
                    error = %err,
                    bucket = %self.bucket,
                    key = %key,
                    "S3 rejected service credentials"
                );
                StorageError::AuthFailed(err.to_string())
            }
            other => {
                tracing::error!(
                    error = %other,
                    bucket = %self.bucket,
                    key = %key,
                    "S3 request failed"
                );
                StorageError::BackendError(other.to_string())
            }
        }
    }
}

#[async_trait]
impl Storage for S3Storage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    /// With `public_base_url`: `{base}/{key}`. With a custom endpoint: path-style
    /// `{endpoint}/{bucket}/{key}`. Otherwise the AWS virtual-hosted form
    /// `https://{bucket}.s3.{region}.amazonaws.com/{key}`.
    fn public_url(&self, key: &str) -> String {
        if let Some(ref base) = self.public_base_url {
            format!("{}/{}", base, key)
        } else if let Some(ref endpoint) = self.endpoint_url {
            format!("{}/{}/{}", endpoint, self.bucket, key)
        } else {
            format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            )
        }
    }

    async fn presigned_put_url(
        &self,
        key: &str,
        _content_type: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        let url = self.sign(Method::PUT, key, expires_in).await?;
        tracing::debug!(
            bucket = %self.bucket,
            key = %key,
            expires_in_secs = expires_in.as_secs(),
            "Issued presigned PUT URL"
        );
        Ok(url)
    }

    async fn presigned_get_url(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        self.sign(Method::GET, key, expires_in).await
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let location = Path::from(key.to_string());
        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(self.map_request_error(key, e)),
        }
    }

    async fn content_length(&self, key: &str) -> StorageResult<u64> {
        let location = Path::from(key.to_string());
        let meta = self
            .store
            .head(&location)
            .await
            .map_err(|e| self.map_request_error(key, e))?;
        Ok(meta.size as u64)
    }

    async fn download(&self, key: &str) -> StorageResult<Vec<u8>> {
        let start = std::time::Instant::now();
        let location = Path::from(key.to_string());

        let result = self
            .store
            .get(&location)
            .await
            .map_err(|e| self.map_request_error(key, e))?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = bytes.len() as u64,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 download successful"
        );

        Ok(bytes.to_vec())
    }
}
