//! Application state shared by every handler.

use crate::services::{ThumbnailIngestService, VideoIngestService};
use tubely_core::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub videos: VideoIngestService,
    pub thumbnails: ThumbnailIngestService,
}
