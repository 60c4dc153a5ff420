use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tubely_core::AppError;

/// Container remuxing capability.
#[async_trait]
pub trait Remuxer: Send + Sync {
    /// Rewrite `input` into `output` with the moov atom at the front.
    async fn faststart(&self, input: &Path, output: &Path) -> Result<(), AppError>;
}

/// Remuxer backed by the `ffmpeg` binary. Streams are copied, not re-encoded.
#[derive(Debug, Clone)]
pub struct FfmpegRemuxer {
    ffmpeg_path: String,
}

impl FfmpegRemuxer {
    pub fn new(ffmpeg_path: impl Into<String>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }
}

impl Default for FfmpegRemuxer {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

#[async_trait]
impl Remuxer for FfmpegRemuxer {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "faststart"
    ))]
    async fn faststart(&self, input: &Path, output: &Path) -> Result<(), AppError> {
        let start = std::time::Instant::now();

        let result = Command::new(&self.ffmpeg_path)
            .arg("-y")
            .arg("-i")
            .arg(input)
            .args(["-c", "copy", "-f", "mp4", "-movflags", "faststart"])
            .arg(output)
            .kill_on_drop(true)
            .output()
            .await;

        let failure = match result {
            Ok(out) if out.status.success() => None,
            Ok(out) => Some(String::from_utf8_lossy(&out.stderr).trim().to_string()),
            Err(e) => Some(format!("Failed to execute ffmpeg: {}", e)),
        };

        if let Some(stderr) = failure {
            if let Err(e) = tokio::fs::remove_file(output).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(error = %e, path = %output.display(), "Failed to remove partial output");
                }
            }
            return Err(AppError::Transcode(stderr));
        }

        tracing::debug!(
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "ffmpeg faststart completed"
        );

        Ok(())
    }
}
