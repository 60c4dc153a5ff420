use async_trait::async_trait;
use std::collections::HashMap;
#[cfg(any(test, feature = "test-utils"))]
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tubely_core::VideoAsset;
use uuid::Uuid;

use super::{RepositoryError, RepositoryResult, VideoRepository};

/// Video records held in process memory. Used when no `DATABASE_URL` is set.
#[derive(Default)]
pub struct InMemoryVideoRepository {
    videos: RwLock<HashMap<Uuid, VideoAsset>>,
    #[cfg(any(test, feature = "test-utils"))]
    fail_updates: AtomicBool,
}

impl InMemoryVideoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `update` fail as if the datastore were down.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }

    #[cfg(any(test, feature = "test-utils"))]
    fn updates_disabled(&self) -> bool {
        self.fail_updates.load(Ordering::SeqCst)
    }

    #[cfg(not(any(test, feature = "test-utils")))]
    fn updates_disabled(&self) -> bool {
        false
    }
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn create(&self, video: &VideoAsset) -> RepositoryResult<VideoAsset> {
        self.videos.write().await.insert(video.id, video.clone());
        Ok(video.clone())
    }

    async fn get(&self, id: Uuid) -> RepositoryResult<Option<VideoAsset>> {
        Ok(self.videos.read().await.get(&id).cloned())
    }

    async fn update(&self, video: &VideoAsset) -> RepositoryResult<VideoAsset> {
        if self.updates_disabled() {
            return Err(RepositoryError::Unavailable(
                "injected update failure".to_string(),
            ));
        }
        let mut videos = self.videos.write().await;
        match videos.get_mut(&video.id) {
            Some(existing) => {
                *existing = video.clone();
                Ok(video.clone())
            }
            None => Err(RepositoryError::NotFound(video.id)),
        }
    }
}
