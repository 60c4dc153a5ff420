use crate::traits::{validate_key, ObjectStorage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Local filesystem storage implementation
///
/// Objects are written to a temporary file next to their destination and
/// renamed into place, so a reader never observes a partial object.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/tubely/media")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:8091/media")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        validate_key(storage_key)?;
        Ok(self.base_path.join(storage_key))
    }
}

#[async_trait]
impl ObjectStorage for LocalStorage {
    async fn put_file(
        &self,
        key: &str,
        path: &Path,
        content_length: u64,
        _content_type: &str,
    ) -> StorageResult<()> {
        let dest = self.key_to_path(key)?;
        let parent = dest
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.base_path.clone());
        fs::create_dir_all(&parent).await?;

        let start = std::time::Instant::now();

        let tmp = tempfile::NamedTempFile::new_in(&parent)?;
        fs::copy(path, tmp.path()).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", dest.display(), e))
        })?;
        tmp.as_file().sync_all()?;
        tmp.persist(&dest).map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to move file into {}: {}",
                dest.display(),
                e.error
            ))
        })?;

        tracing::info!(
            path = %dest.display(),
            key = %key,
            size_bytes = content_length,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
