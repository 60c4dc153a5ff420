//! Tubely Storage Library
//!
//! This crate provides the object-storage abstraction used for uploaded videos,
//! the key derivation shared by every backend, and the three thumbnail
//! persistence strategies.
//!
//! # Storage key format
//!
//! Video keys are `{aspect}/{token}.{extension}` where `aspect` is one of
//! `landscape`, `portrait` or `other` and `token` is 32 lowercase hex characters.
//! Keys never contain any part of a client-supplied filename. Key generation is
//! centralized in the `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod thumbnail;
pub mod traits;

// Re-export commonly used types
pub use factory::{create_storage, create_thumbnail_store};
pub use keys::StorageKey;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use thumbnail::{
    DataUrlThumbnailStore, FilesystemThumbnailStore, MemoryThumbnailStore, ThumbnailStore,
};
pub use traits::{ObjectStorage, StorageError, StorageResult};
pub use tubely_core::StorageBackend;
