//! Ingestion pipelines and the record updater they share.

pub mod records;
pub mod thumbnail_ingest;
pub mod video_ingest;

use bytes::Bytes;
use futures::Stream;
use tubely_core::AppError;

pub use records::RecordUpdater;
pub use thumbnail_ingest::ThumbnailIngestService;
pub use video_ingest::VideoIngestService;

/// An uploaded file as seen by a pipeline: the declared metadata plus the body.
pub struct IncomingFile<S> {
    pub content_type: Option<String>,
    /// Size the client declared for the file, if any
    pub declared_len: Option<u64>,
    pub body: S,
}

impl<S> IncomingFile<S>
where
    S: Stream<Item = Result<Bytes, AppError>> + Send,
{
    pub fn new(content_type: Option<String>, declared_len: Option<u64>, body: S) -> Self {
        Self {
            content_type,
            declared_len,
            body,
        }
    }
}
