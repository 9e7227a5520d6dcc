//! In-memory Storage implementation for tests

use crate::traits::{Storage, StorageError, StorageResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

pub const MOCK_BASE_URL: &str = "https://storage.test";

/// Mock storage that keeps objects in memory.
///
/// Presigned URLs point at [`MOCK_BASE_URL`]; tests simulate the client's direct
/// transfer with [`MockStorage::put_object`].
#[derive(Clone, Default)]
pub struct MockStorage {
    objects: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    reported_lengths: Arc<Mutex<HashMap<String, u64>>>,
    reject_credentials: Arc<AtomicBool>,
    fail_requests: Arc<AtomicBool>,
    presign_calls: Arc<AtomicUsize>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn objects(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.objects.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store bytes under a key, as the client's direct PUT would
    pub fn put_object(&self, key: &str, data: Vec<u8>) {
        self.objects().insert(key.to_string(), data);
    }

    /// Report `size` from `content_length` regardless of the stored bytes,
    /// as when an object is replaced between the size check and the download
    pub fn report_content_length(&self, key: &str, size: u64) {
        self.reported_lengths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), size);
    }

    pub fn has_object(&self, key: &str) -> bool {
        self.objects().contains_key(key)
    }

    pub fn object_count(&self) -> usize {
        self.objects().len()
    }

    /// Make every signing call fail as if the service credentials were rejected
    pub fn reject_credentials(&self, reject: bool) {
        self.reject_credentials.store(reject, Ordering::SeqCst);
    }

    /// Make every object request fail with a backend error
    pub fn fail_requests(&self, fail: bool) {
        self.fail_requests.store(fail, Ordering::SeqCst);
    }

    pub fn presign_calls(&self) -> usize {
        self.presign_calls.load(Ordering::SeqCst)
    }

    fn check_credentials(&self) -> StorageResult<()> {
        self.presign_calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_credentials.load(Ordering::SeqCst) {
            return Err(StorageError::AuthFailed(
                "InvalidAccessKeyId: the key id does not exist".to_string(),
            ));
        }
        Ok(())
    }

    fn check_requests(&self) -> StorageResult<()> {
        if self.fail_requests.load(Ordering::SeqCst) {
            return Err(StorageError::BackendError(
                "connection reset by peer".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for MockStorage {
    fn bucket(&self) -> &str {
        "test-bucket"
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/test-bucket/{}", MOCK_BASE_URL, key)
    }

    async fn presigned_put_url(
        &self,
        key: &str,
        _content_type: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        self.check_credentials()?;
        Ok(format!(
            "{}/test-bucket/{}?X-Amz-Expires={}&X-Amz-Signature=put",
            MOCK_BASE_URL,
            key,
            expires_in.as_secs()
        ))
    }

    async fn presigned_get_url(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        self.check_credentials()?;
        Ok(format!(
            "{}/test-bucket/{}?X-Amz-Expires={}&X-Amz-Signature=get",
            MOCK_BASE_URL,
            key,
            expires_in.as_secs()
        ))
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        self.check_requests()?;
        Ok(self.has_object(key))
    }

    async fn content_length(&self, key: &str) -> StorageResult<u64> {
        self.check_requests()?;
        let reported = self
            .reported_lengths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .copied();
        if let Some(size) = reported {
            return Ok(size);
        }
        self.objects()
            .get(key)
            .map(|data| data.len() as u64)
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn download(&self, key: &str) -> StorageResult<Vec<u8>> {
        self.check_requests()?;
        self.objects()
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }
}
