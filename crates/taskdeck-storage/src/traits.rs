//! Storage abstraction trait
//!
//! This module defines the narrow object-storage contract the upload flow depends on.

use async_trait::async_trait;
use std::time::Duration;
use taskdeck_core::AppError;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// The storage service rejected the service-level credentials, or none could be loaded.
    #[error("Authorization failed: {0}")]
    AuthFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::AuthFailed(msg) => AppError::UpstreamAuth(msg),
            StorageError::NotFound(key) => {
                AppError::NotFound(format!("Object not found in storage: {}", key))
            }
            StorageError::InvalidKey(msg) => AppError::Validation(msg),
            StorageError::ConfigError(msg) => {
                AppError::Internal(format!("Storage configuration error: {}", msg))
            }
            StorageError::DownloadFailed(msg) | StorageError::BackendError(msg) => {
                AppError::UpstreamTransfer(msg)
            }
        }
    }
}

/// Storage abstraction trait
///
/// Objects are addressed by `{bucket, key}`. Implementations never receive image
/// bytes from the server during an upload; the client transfers them directly
/// using a URL from [`Storage::presigned_put_url`].
#[async_trait]
pub trait Storage: Send + Sync {
    /// Bucket all keys are resolved against
    fn bucket(&self) -> &str;

    /// Static, non-expiring URL of an object. Pure string construction; does not
    /// check that the object exists.
    fn public_url(&self, key: &str) -> String;

    /// Generate a presigned PUT URL authorizing one upload to `key`.
    async fn presigned_put_url(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> StorageResult<String>;

    /// Generate a presigned GET URL for reading `key` until it expires.
    async fn presigned_get_url(&self, key: &str, expires_in: Duration) -> StorageResult<String>;

    /// Check if an object exists
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Size in bytes of an object; `NotFound` if it does not exist.
    async fn content_length(&self, key: &str) -> StorageResult<u64>;

    /// Download an object into memory
    async fn download(&self, key: &str) -> StorageResult<Vec<u8>>;
}
