//! In-memory storage fakes for tests

use crate::traits::{validate_key, ObjectStorage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// A stored object as seen by [`RecordingStorage`].
#[derive(Debug, Clone)]
pub struct RecordedObject {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Object storage that keeps uploads in memory and counts every call,
/// including rejected ones.
pub struct RecordingStorage {
    objects: Mutex<HashMap<String, RecordedObject>>,
    calls: AtomicUsize,
    fail: AtomicBool,
    base_url: String,
}

impl RecordingStorage {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Make every following upload fail.
    pub fn failing(self) -> Self {
        self.fail.store(true, Ordering::SeqCst);
        self
    }

    /// Number of `put_file` calls that reached this storage.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.objects.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn get(&self, key: &str) -> Option<RecordedObject> {
        self.objects.lock().unwrap().get(key).cloned()
    }
}

impl Default for RecordingStorage {
    fn default() -> Self {
        Self::new("https://cdn.example.com")
    }
}

#[async_trait]
impl ObjectStorage for RecordingStorage {
    async fn put_file(
        &self,
        key: &str,
        path: &Path,
        _content_length: u64,
        content_type: &str,
    ) -> StorageResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        validate_key(key)?;
        if self.fail.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed(
                "injected upload failure".to_string(),
            ));
        }
        let data = tokio::fs::read(path).await?;
        self.objects.lock().unwrap().insert(
            key.to_string(),
            RecordedObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
