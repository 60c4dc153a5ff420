//! Storage abstraction trait
//!
//! This module defines the ObjectStorage trait that all video storage backends implement.

use crate::StorageBackend;
use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;
use tubely_core::AppError;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Payload too large: {0}")]
    TooLarge(String),

    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UploadFailed(msg) | StorageError::BackendError(msg) => {
                AppError::StoreUpload(msg)
            }
            StorageError::TooLarge(msg) => AppError::PayloadTooLarge(msg),
            StorageError::IoError(e) => AppError::Io(e.to_string()),
            StorageError::InvalidKey(msg)
            | StorageError::KeyGeneration(msg)
            | StorageError::ConfigError(msg) => AppError::Internal(msg),
        }
    }
}

/// Remote object storage for finished video files.
///
/// Uploads are all-or-nothing: either the object is fully written under the
/// key, or nothing is left behind. No backend retries on its own.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Upload the file at `path` (of `content_length` bytes) under `key`,
    /// tagged with `content_type`.
    async fn put_file(
        &self,
        key: &str,
        path: &Path,
        content_length: u64,
        content_type: &str,
    ) -> StorageResult<()>;

    /// Public URL under which `key` is reachable once uploaded.
    fn public_url(&self, key: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

/// Reject keys that could escape a prefix or address the bucket root.
pub(crate) fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() || key.contains("..") || key.starts_with('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey(format!(
            "Storage key contains invalid characters: {}",
            key
        )));
    }
    Ok(())
}
