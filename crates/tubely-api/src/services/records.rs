use chrono::Utc;
use std::sync::Arc;
use tubely_core::{AppError, VideoAsset};
use tubely_db::{RepositoryError, VideoRepository};
use uuid::Uuid;

/// Reads video records for the ownership gate and writes back media URLs.
#[derive(Clone)]
pub struct RecordUpdater {
    repository: Arc<dyn VideoRepository>,
}

impl RecordUpdater {
    pub fn new(repository: Arc<dyn VideoRepository>) -> Self {
        Self { repository }
    }

    /// Load `video_id` and check that `user_id` owns it.
    #[tracing::instrument(skip(self))]
    pub async fn authorize(&self, video_id: Uuid, user_id: Uuid) -> Result<VideoAsset, AppError> {
        let video = self
            .repository
            .get(video_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))?;

        if !video.is_owned_by(user_id) {
            tracing::warn!(
                video_id = %video_id,
                user_id = %user_id,
                owner_id = %video.owner_id,
                "Upload rejected: caller does not own video"
            );
            return Err(AppError::Unauthorized(
                "Not authorized to update this video".to_string(),
            ));
        }

        Ok(video)
    }

    /// Record the public URL of an uploaded video. `key` is logged if the write fails.
    pub async fn set_video_url(
        &self,
        mut video: VideoAsset,
        url: String,
        key: &str,
    ) -> Result<VideoAsset, AppError> {
        video.video_url = Some(url);
        self.persist(video, key).await
    }

    /// Record a thumbnail reference. `reference` is logged if the write fails.
    pub async fn set_thumbnail_url(
        &self,
        mut video: VideoAsset,
        url: String,
        reference: &str,
    ) -> Result<VideoAsset, AppError> {
        video.thumbnail_url = Some(url);
        self.persist(video, reference).await
    }

    async fn persist(&self, mut video: VideoAsset, orphan: &str) -> Result<VideoAsset, AppError> {
        video.updated_at = Utc::now();
        match self.repository.update(&video).await {
            Ok(updated) => Ok(updated),
            Err(e) => {
                // The stored object stays in place; nothing points at it now.
                tracing::error!(
                    video_id = %video.id,
                    orphaned = orphan,
                    error = %e,
                    "Failed to update video record after storing media"
                );
                Err(match e {
                    RepositoryError::NotFound(id) => {
                        AppError::RecordPersist(format!("Video {} disappeared before update", id))
                    }
                    other => AppError::RecordPersist(other.to_string()),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubely_db::InMemoryVideoRepository;

    async fn seeded() -> (Arc<InMemoryVideoRepository>, VideoAsset) {
        let repo = Arc::new(InMemoryVideoRepository::new());
        let video = VideoAsset::new(Uuid::new_v4(), "Boots", "");
        repo.create(&video).await.unwrap();
        (repo, video)
    }

    #[tokio::test]
    async fn test_authorize_owner() {
        let (repo, video) = seeded().await;
        let records = RecordUpdater::new(repo);
        let loaded = records.authorize(video.id, video.owner_id).await.unwrap();
        assert_eq!(loaded.id, video.id);
    }

    #[tokio::test]
    async fn test_authorize_rejects_other_user() {
        let (repo, video) = seeded().await;
        let records = RecordUpdater::new(repo);
        let err = records
            .authorize(video.id, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_authorize_missing_video() {
        let (repo, _) = seeded().await;
        let records = RecordUpdater::new(repo);
        let err = records
            .authorize(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_set_video_url_bumps_updated_at() {
        let (repo, video) = seeded().await;
        let records = RecordUpdater::new(repo.clone());
        let before = video.updated_at;

        let updated = records
            .set_video_url(
                video.clone(),
                "https://cdn.example.com/portrait/abc.mp4".to_string(),
                "portrait/abc.mp4",
            )
            .await
            .unwrap();
        assert_eq!(
            updated.video_url.as_deref(),
            Some("https://cdn.example.com/portrait/abc.mp4")
        );
        assert!(updated.updated_at >= before);

        let stored = repo.get(video.id).await.unwrap().unwrap();
        assert_eq!(stored.video_url, updated.video_url);
    }

    #[tokio::test]
    async fn test_persist_failure_is_record_persist() {
        let (repo, video) = seeded().await;
        repo.fail_updates();
        let records = RecordUpdater::new(repo.clone());

        let err = records
            .set_thumbnail_url(video.clone(), "data:image/png;base64,AA==".to_string(), "data_url")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::RecordPersist(_)));

        let stored = repo.get(video.id).await.unwrap().unwrap();
        assert!(stored.thumbnail_url.is_none());
    }
}
