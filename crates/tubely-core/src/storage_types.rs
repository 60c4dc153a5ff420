use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Remote object storage backends for uploaded videos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    S3,
    Local,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "s3" => Ok(StorageBackend::S3),
            "local" => Ok(StorageBackend::Local),
            _ => Err(anyhow::anyhow!("Invalid storage backend: {}", s)),
        }
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageBackend::S3 => write!(f, "s3"),
            StorageBackend::Local => write!(f, "local"),
        }
    }
}

/// Where thumbnail bytes live. Exactly one strategy is active per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThumbnailStrategy {
    /// File under the public assets directory.
    Filesystem,
    /// Base64 data URL embedded in the video record.
    DataUrl,
    /// Process-lifetime in-memory map; lost on restart.
    Memory,
}

impl FromStr for ThumbnailStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "filesystem" | "fs" => Ok(ThumbnailStrategy::Filesystem),
            "data_url" | "dataurl" => Ok(ThumbnailStrategy::DataUrl),
            "memory" => Ok(ThumbnailStrategy::Memory),
            _ => Err(anyhow::anyhow!("Invalid thumbnail strategy: {}", s)),
        }
    }
}

impl Display for ThumbnailStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ThumbnailStrategy::Filesystem => write!(f, "filesystem"),
            ThumbnailStrategy::DataUrl => write!(f, "data_url"),
            ThumbnailStrategy::Memory => write!(f, "memory"),
        }
    }
}

/// Filename scheme for the filesystem thumbnail strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThumbnailNaming {
    #[default]
    Random,
    VideoId,
}

impl FromStr for ThumbnailNaming {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "random" => Ok(ThumbnailNaming::Random),
            "video_id" | "videoid" => Ok(ThumbnailNaming::VideoId),
            _ => Err(anyhow::anyhow!("Invalid thumbnail naming: {}", s)),
        }
    }
}
