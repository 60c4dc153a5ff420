//! Video ingestion pipeline
//!
//! `Received → Validated → Staged → Probed → Classified → Transcoded →
//! KeyAssigned → Uploaded → RecordUpdated → Complete`
//!
//! Any failure moves the request to `Aborted`. The staged upload and the
//! transcoded intermediate are [`tempfile::TempPath`]s owned by this function,
//! so both are removed from the staging directory on every exit path.

use bytes::Bytes;
use futures::Stream;
use std::sync::Arc;
use std::time::Instant;
use tubely_core::{AppError, MediaKind, VideoAsset};
use tubely_processing::{classify, Prober, Remuxer, StagingArea, UploadValidator};
use tubely_storage::{ObjectStorage, StorageKey};

use super::{IncomingFile, RecordUpdater};

#[derive(Clone)]
pub struct VideoIngestService {
    validator: UploadValidator,
    staging: StagingArea,
    prober: Arc<dyn Prober>,
    remuxer: Arc<dyn Remuxer>,
    storage: Arc<dyn ObjectStorage>,
    records: RecordUpdater,
}

impl VideoIngestService {
    pub fn new(
        validator: UploadValidator,
        staging: StagingArea,
        prober: Arc<dyn Prober>,
        remuxer: Arc<dyn Remuxer>,
        storage: Arc<dyn ObjectStorage>,
        records: RecordUpdater,
    ) -> Self {
        Self {
            validator,
            staging,
            prober,
            remuxer,
            storage,
            records,
        }
    }

    pub fn records(&self) -> &RecordUpdater {
        &self.records
    }

    pub fn max_bytes(&self) -> u64 {
        self.validator.max_bytes(MediaKind::Video)
    }

    /// Run the pipeline for an upload to `video`, whose ownership has
    /// already been checked.
    #[tracing::instrument(skip_all, fields(video_id = %video.id))]
    pub async fn ingest<S>(
        &self,
        video: VideoAsset,
        file: IncomingFile<S>,
    ) -> Result<VideoAsset, AppError>
    where
        S: Stream<Item = Result<Bytes, AppError>> + Send,
    {
        let start = Instant::now();
        tracing::debug!(stage = "Received", "Video upload received");

        match self.run(video, file).await {
            Ok(video) => {
                tracing::debug!(
                    stage = "Complete",
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Video upload complete"
                );
                Ok(video)
            }
            Err(e) => {
                tracing::debug!(stage = "Aborted", error = %e, "Video upload aborted");
                Err(e)
            }
        }
    }

    async fn run<S>(&self, video: VideoAsset, file: IncomingFile<S>) -> Result<VideoAsset, AppError>
    where
        S: Stream<Item = Result<Bytes, AppError>> + Send,
    {
        let upload = self.validator.validate(
            MediaKind::Video,
            file.content_type.as_deref(),
            file.declared_len,
        )?;
        tracing::debug!(stage = "Validated", media_type = %upload.media_type);

        let staged = self
            .staging
            .stage(file.body, upload.max_bytes, upload.extension)
            .await?;
        if staged.is_empty() {
            return Err(AppError::BadForm("Video file is empty".to_string()));
        }
        tracing::debug!(stage = "Staged", size_bytes = staged.len());

        let probe = self.prober.probe(staged.path()).await?;
        tracing::debug!(stage = "Probed", width = probe.width, height = probe.height);

        let aspect = classify(probe.width, probe.height);
        tracing::debug!(stage = "Classified", aspect = %aspect);

        let processed = self.staging.scratch_path(upload.extension)?;
        self.remuxer.faststart(staged.path(), &processed).await?;
        drop(staged);
        let processed_len = tokio::fs::metadata(&processed)
            .await
            .map_err(|e| AppError::Io(format!("Failed to stat processed video: {}", e)))?
            .len();
        tracing::debug!(stage = "Transcoded", size_bytes = processed_len);

        let key = StorageKey::for_video(aspect, upload.extension)?.to_string();
        tracing::debug!(stage = "KeyAssigned", key = %key);

        self.storage
            .put_file(&key, &processed, processed_len, &upload.media_type)
            .await?;
        drop(processed);
        let url = self.storage.public_url(&key);
        tracing::info!(
            key = %key,
            size_bytes = processed_len,
            backend = %self.storage.backend_type(),
            "Video uploaded"
        );
        tracing::debug!(stage = "Uploaded", url = %url);

        let updated = self.records.set_video_url(video, url, &key).await?;
        tracing::debug!(stage = "RecordUpdated");

        Ok(updated)
    }
}
