//! Thumbnail ingestion pipeline
//!
//! Validation, a bounded in-memory read, then the configured
//! [`ThumbnailStore`] and the record update. No probing or transcoding.

use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};
use std::sync::Arc;
use tubely_core::{AppError, MediaKind, Thumbnail, ThumbnailStrategy, VideoAsset};
use tubely_processing::UploadValidator;
use tubely_storage::ThumbnailStore;
use uuid::Uuid;

use super::{IncomingFile, RecordUpdater};

#[derive(Clone)]
pub struct ThumbnailIngestService {
    validator: UploadValidator,
    store: Arc<dyn ThumbnailStore>,
    records: RecordUpdater,
}

impl ThumbnailIngestService {
    pub fn new(
        validator: UploadValidator,
        store: Arc<dyn ThumbnailStore>,
        records: RecordUpdater,
    ) -> Self {
        Self {
            validator,
            store,
            records,
        }
    }

    pub fn records(&self) -> &RecordUpdater {
        &self.records
    }

    pub fn max_bytes(&self) -> u64 {
        self.validator.max_bytes(MediaKind::Thumbnail)
    }

    pub fn strategy(&self) -> ThumbnailStrategy {
        self.store.strategy()
    }

    /// Thumbnail bytes held in process memory, if the active strategy keeps any.
    pub async fn cached(&self, video_id: Uuid) -> Option<Thumbnail> {
        self.store.get(video_id).await
    }

    #[tracing::instrument(skip_all, fields(video_id = %video.id, strategy = %self.store.strategy()))]
    pub async fn ingest<S>(
        &self,
        video: VideoAsset,
        file: IncomingFile<S>,
    ) -> Result<VideoAsset, AppError>
    where
        S: Stream<Item = Result<Bytes, AppError>> + Send,
    {
        let upload = self.validator.validate(
            MediaKind::Thumbnail,
            file.content_type.as_deref(),
            file.declared_len,
        )?;

        let data = read_bounded(file.body, upload.max_bytes).await?;
        if data.is_empty() {
            return Err(AppError::BadForm("Thumbnail file is empty".to_string()));
        }
        let size_bytes = data.len();

        let url = self
            .store
            .store(video.id, Thumbnail::new(data, upload.media_type), upload.extension)
            .await?;
        tracing::info!(size_bytes = size_bytes, "Thumbnail stored");

        let reference = match self.store.strategy() {
            ThumbnailStrategy::DataUrl => "data URL".to_string(),
            _ => url.clone(),
        };
        self.records.set_thumbnail_url(video, url, &reference).await
    }
}

/// Collect `body` in memory, failing once more than `max_bytes` have arrived.
async fn read_bounded<S>(body: S, max_bytes: u64) -> Result<Bytes, AppError>
where
    S: Stream<Item = Result<Bytes, AppError>>,
{
    let mut body = std::pin::pin!(body);
    let mut buf = BytesMut::new();
    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        if (buf.len() + chunk.len()) as u64 > max_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "Thumbnail exceeds {} bytes",
                max_bytes
            )));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf.freeze())
}
