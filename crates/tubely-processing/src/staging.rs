//! Staging of upload bodies on local disk.
//!
//! A [`StagedFile`] owns its temporary file: dropping it deletes the file, so
//! every exit path of a request cleans up without explicit bookkeeping.

use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;
use tubely_core::AppError;

const STAGED_PREFIX: &str = "tubely-upload-";

/// A request body copied to a temporary file.
#[derive(Debug)]
pub struct StagedFile {
    path: TempPath,
    len: u64,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Directory that holds staged uploads and transcoded intermediates.
#[derive(Debug, Clone)]
pub struct StagingArea {
    dir: PathBuf,
}

impl StagingArea {
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            AppError::Io(format!(
                "Failed to create staging directory {}: {}",
                dir.display(),
                e
            ))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Copy `body` into a new temporary file, failing with `PayloadTooLarge`
    /// as soon as more than `max_bytes` have arrived.
    pub async fn stage<S>(
        &self,
        body: S,
        max_bytes: u64,
        extension: &str,
    ) -> Result<StagedFile, AppError>
    where
        S: Stream<Item = Result<Bytes, AppError>>,
    {
        let mut body = std::pin::pin!(body);
        let (file, path) = self.temp_file(extension)?.into_parts();
        let mut file = tokio::fs::File::from_std(file);
        let mut len: u64 = 0;

        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            len += chunk.len() as u64;
            if len > max_bytes {
                return Err(AppError::PayloadTooLarge(format!(
                    "Upload exceeds {} bytes",
                    max_bytes
                )));
            }
            file.write_all(&chunk)
                .await
                .map_err(|e| AppError::Io(format!("Failed to write staged file: {}", e)))?;
        }

        file.flush()
            .await
            .map_err(|e| AppError::Io(format!("Failed to write staged file: {}", e)))?;

        tracing::debug!(
            path = %path.display(),
            size_bytes = len,
            "Upload staged"
        );

        Ok(StagedFile { path, len })
    }

    /// Reserve an empty temporary path for a tool to write into.
    pub fn scratch_path(&self, extension: &str) -> Result<TempPath, AppError> {
        Ok(self.temp_file(extension)?.into_temp_path())
    }

    fn temp_file(&self, extension: &str) -> Result<tempfile::NamedTempFile, AppError> {
        tempfile::Builder::new()
            .prefix(STAGED_PREFIX)
            .suffix(&format!(".{}", extension))
            .tempfile_in(&self.dir)
            .map_err(|e| AppError::Io(format!("Failed to create temp file: {}", e)))
    }
}
