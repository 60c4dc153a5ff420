use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use tokio::process::Command;
use tubely_core::AppError;

/// Geometry of the first video stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResult {
    pub width: u32,
    pub height: u32,
}

/// Media inspection capability.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, path: &Path) -> Result<ProbeResult, AppError>;
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
}

/// Parse `ffprobe -print_format json -show_streams` output.
///
/// Only the first stream is read; a missing dimension is 0.
pub fn parse_probe_output(stdout: &[u8]) -> Result<ProbeResult, AppError> {
    let output: FfprobeOutput = serde_json::from_slice(stdout)
        .map_err(|e| AppError::Probe(format!("Failed to parse ffprobe output: {}", e)))?;

    let stream = output.streams.first().ok_or(AppError::NoStreamsFound)?;

    Ok(ProbeResult {
        width: stream.width.unwrap_or(0),
        height: stream.height.unwrap_or(0),
    })
}

/// Prober backed by the `ffprobe` binary.
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    ffprobe_path: String,
}

impl FfprobeProber {
    pub fn new(ffprobe_path: impl Into<String>) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
        }
    }
}

impl Default for FfprobeProber {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

#[async_trait]
impl Prober for FfprobeProber {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    async fn probe(&self, path: &Path) -> Result<ProbeResult, AppError> {
        let start = std::time::Instant::now();

        let output = Command::new(&self.ffprobe_path)
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_streams",
                "-select_streams",
                "v:0",
            ])
            .arg(path)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| AppError::Probe(format!("Failed to execute ffprobe: {}", e)))?;

        if !output.status.success() {
            return Err(AppError::Probe(format!(
                "ffprobe exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let result = parse_probe_output(&output.stdout)?;

        tracing::debug!(
            width = result.width,
            height = result.height,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "ffprobe completed"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_first_stream() {
        let json = br#"{"streams":[
            {"index":0,"codec_type":"video","width":1920,"height":1080},
            {"index":1,"codec_type":"video","width":320,"height":240}
        ]}"#;
        assert_eq!(
            parse_probe_output(json).unwrap(),
            ProbeResult {
                width: 1920,
                height: 1080
            }
        );
    }

    #[test]
    fn test_parse_missing_dimensions() {
        let json = br#"{"streams":[{"index":0,"codec_type":"video"}]}"#;
        assert_eq!(
            parse_probe_output(json).unwrap(),
            ProbeResult {
                width: 0,
                height: 0
            }
        );
    }

    #[test]
    fn test_parse_no_streams() {
        assert!(matches!(
            parse_probe_output(br#"{"streams":[]}"#),
            Err(AppError::NoStreamsFound)
        ));
        assert!(matches!(
            parse_probe_output(b"{}"),
            Err(AppError::NoStreamsFound)
        ));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            parse_probe_output(b"not json"),
            Err(AppError::Probe(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_binary_is_probe_error() {
        let prober = FfprobeProber::new("/nonexistent/ffprobe");
        let err = prober.probe(Path::new("/tmp/x.mp4")).await.unwrap_err();
        assert!(matches!(err, AppError::Probe(_)));
    }
}
