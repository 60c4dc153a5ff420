//! Fake probe and remux tools for tests

use crate::faststart::Remuxer;
use crate::probe::{ProbeResult, Prober};
use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tubely_core::AppError;

/// Reports fixed dimensions for any file.
#[derive(Debug)]
pub struct FixedProber {
    result: ProbeResult,
    calls: AtomicUsize,
}

impl FixedProber {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            result: ProbeResult { width, height },
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Prober for FixedProber {
    async fn probe(&self, path: &Path) -> Result<ProbeResult, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !path.exists() {
            return Err(AppError::Probe(format!("{} does not exist", path.display())));
        }
        Ok(self.result)
    }
}

/// Fails every probe, either as a tool failure or as a file with no video stream.
#[derive(Debug, Default)]
pub struct FailingProber {
    no_streams: bool,
}

impl FailingProber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn no_streams() -> Self {
        Self { no_streams: true }
    }
}

#[async_trait]
impl Prober for FailingProber {
    async fn probe(&self, _path: &Path) -> Result<ProbeResult, AppError> {
        if self.no_streams {
            Err(AppError::NoStreamsFound)
        } else {
            Err(AppError::Probe("injected probe failure".to_string()))
        }
    }
}

/// Copies the input to the output unchanged.
#[derive(Debug, Default)]
pub struct CopyRemuxer;

#[async_trait]
impl Remuxer for CopyRemuxer {
    async fn faststart(&self, input: &Path, output: &Path) -> Result<(), AppError> {
        tokio::fs::copy(input, output)
            .await
            .map_err(|e| AppError::Transcode(e.to_string()))?;
        Ok(())
    }
}

/// Writes a partial output, then fails.
#[derive(Debug, Default)]
pub struct FailingRemuxer;

#[async_trait]
impl Remuxer for FailingRemuxer {
    async fn faststart(&self, _input: &Path, output: &Path) -> Result<(), AppError> {
        tokio::fs::write(output, b"partial").await?;
        Err(AppError::Transcode(
            "[mov,mp4,m4a] moov atom not found".to_string(),
        ))
    }
}
