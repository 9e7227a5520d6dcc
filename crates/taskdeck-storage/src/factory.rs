use crate::{S3Storage, Storage, StorageResult};
use std::sync::Arc;
use taskdeck_core::Config;

/// Create the storage backend described by configuration
pub fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    let storage = S3Storage::new(
        config.s3_bucket().to_string(),
        config.s3_region().to_string(),
        config.s3_endpoint().map(String::from),
        config.public_base_url().map(String::from),
    )?;

    tracing::info!(
        bucket = %config.s3_bucket(),
        region = %config.s3_region(),
        endpoint = ?config.s3_endpoint(),
        "S3 storage initialized"
    );

    Ok(Arc::new(storage))
}
