use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// The two kinds of upload the service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Thumbnail,
}

impl MediaKind {
    /// Exact media types accepted for this kind.
    pub fn allowed_content_types(&self) -> &'static [&'static str] {
        match self {
            MediaKind::Video => &["video/mp4"],
            MediaKind::Thumbnail => &["image/jpeg", "image/png"],
        }
    }

    /// Multipart field carrying the file.
    pub fn form_field(&self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Thumbnail => "thumbnail",
        }
    }

    /// Canonical file extension for an allowed media type.
    pub fn extension_for(&self, media_type: &str) -> Option<&'static str> {
        match (self, media_type) {
            (MediaKind::Video, "video/mp4") => Some("mp4"),
            (MediaKind::Thumbnail, "image/jpeg") => Some("jpg"),
            (MediaKind::Thumbnail, "image/png") => Some("png"),
            _ => None,
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MediaKind::Video => write!(f, "video"),
            MediaKind::Thumbnail => write!(f, "thumbnail"),
        }
    }
}

/// Storage category derived from a video stream's width/height ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectClass {
    /// 16:9
    Landscape,
    /// 9:16
    Portrait,
    Other,
}

impl AspectClass {
    /// Storage key prefix for this class.
    pub fn prefix(&self) -> &'static str {
        match self {
            AspectClass::Landscape => "landscape",
            AspectClass::Portrait => "portrait",
            AspectClass::Other => "other",
        }
    }
}

impl Display for AspectClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.prefix())
    }
}
