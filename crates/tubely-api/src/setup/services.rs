//! Pipeline wiring

use crate::services::{RecordUpdater, ThumbnailIngestService, VideoIngestService};
use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::VideoRepository;
use tubely_processing::{FfmpegRemuxer, FfprobeProber, Prober, Remuxer, StagingArea, UploadValidator};
use tubely_storage::{ObjectStorage, ThumbnailStore};

/// Capabilities the pipelines are built from. Tests construct this directly
/// with fakes.
pub struct Components {
    pub repository: Arc<dyn VideoRepository>,
    pub storage: Arc<dyn ObjectStorage>,
    pub thumbnail_store: Arc<dyn ThumbnailStore>,
    pub prober: Arc<dyn Prober>,
    pub remuxer: Arc<dyn Remuxer>,
}

impl Components {
    /// Real ffprobe/ffmpeg tools at the configured paths.
    pub fn from_config(
        config: &Config,
        repository: Arc<dyn VideoRepository>,
        storage: Arc<dyn ObjectStorage>,
        thumbnail_store: Arc<dyn ThumbnailStore>,
    ) -> Self {
        Self {
            repository,
            storage,
            thumbnail_store,
            prober: Arc::new(FfprobeProber::new(config.ffprobe_path.clone())),
            remuxer: Arc::new(FfmpegRemuxer::new(config.ffmpeg_path.clone())),
        }
    }
}

pub async fn initialize_services(config: &Config, components: Components) -> Result<Arc<AppState>> {
    let validator = UploadValidator::new(config.max_video_size_bytes, config.max_thumbnail_size_bytes);
    let staging = StagingArea::new(&config.staging_dir)
        .await
        .context("Failed to prepare staging directory")?;
    tracing::info!(
        staging_dir = %staging.dir().display(),
        max_video_mb = config.max_video_size_bytes / 1024 / 1024,
        max_thumbnail_mb = config.max_thumbnail_size_bytes / 1024 / 1024,
        "Upload pipelines configured"
    );

    let records = RecordUpdater::new(components.repository);

    let videos = VideoIngestService::new(
        validator.clone(),
        staging,
        components.prober,
        components.remuxer,
        components.storage,
        records.clone(),
    );
    let thumbnails = ThumbnailIngestService::new(validator, components.thumbnail_store, records);

    Ok(Arc::new(AppState {
        config: config.clone(),
        videos,
        thumbnails,
    }))
}
