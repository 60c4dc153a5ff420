//! Video record repositories

pub mod memory;
pub mod video;

pub use memory::InMemoryVideoRepository;
pub use video::PgVideoRepository;

use async_trait::async_trait;
use tubely_core::{AppError, VideoAsset};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Video not found: {0}")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Datastore unavailable: {0}")]
    Unavailable(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => AppError::NotFound(format!("Video {} not found", id)),
            other => AppError::Internal(other.to_string()),
        }
    }
}

/// Create/read/update primitives over video records.
///
/// Writes are last-writer-wins; no optimistic concurrency is attempted.
#[async_trait]
pub trait VideoRepository: Send + Sync {
    async fn create(&self, video: &VideoAsset) -> RepositoryResult<VideoAsset>;

    async fn get(&self, id: Uuid) -> RepositoryResult<Option<VideoAsset>>;

    /// Persist every mutable field of `video`. Fails with `NotFound` if the row is gone.
    async fn update(&self, video: &VideoAsset) -> RepositoryResult<VideoAsset>;
}
