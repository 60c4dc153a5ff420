use tubely_core::{AppError, MediaKind};

/// Outcome of a successful validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUpload {
    pub kind: MediaKind,
    /// Bare, lowercased media type, e.g. `video/mp4`
    pub media_type: String,
    /// Canonical extension for `media_type`
    pub extension: &'static str,
    /// Ceiling to enforce while staging
    pub max_bytes: u64,
}

/// Upload validator
///
/// Checks the declared content type against the allow-list for the media kind
/// and the declared size against the configured ceiling. Performs no I/O.
#[derive(Debug, Clone)]
pub struct UploadValidator {
    max_video_bytes: u64,
    max_thumbnail_bytes: u64,
}

impl UploadValidator {
    pub fn new(max_video_bytes: u64, max_thumbnail_bytes: u64) -> Self {
        Self {
            max_video_bytes,
            max_thumbnail_bytes,
        }
    }

    pub fn max_bytes(&self, kind: MediaKind) -> u64 {
        match kind {
            MediaKind::Video => self.max_video_bytes,
            MediaKind::Thumbnail => self.max_thumbnail_bytes,
        }
    }

    /// Validate a declared content type and, when known, the body size.
    pub fn validate(
        &self,
        kind: MediaKind,
        declared_content_type: Option<&str>,
        declared_len: Option<u64>,
    ) -> Result<ValidatedUpload, AppError> {
        let media_type = declared_content_type
            .map(bare_media_type)
            .filter(|mt| !mt.is_empty())
            .ok_or_else(|| {
                AppError::UnsupportedMediaType(format!("Missing Content-Type for {}", kind))
            })?;

        let extension = kind.extension_for(&media_type).ok_or_else(|| {
            AppError::UnsupportedMediaType(format!(
                "Unsupported {} type '{}' (allowed: {})",
                kind,
                media_type,
                kind.allowed_content_types().join(", ")
            ))
        })?;

        let max_bytes = self.max_bytes(kind);
        self.check_size(kind, declared_len, max_bytes)?;

        Ok(ValidatedUpload {
            kind,
            media_type,
            extension,
            max_bytes,
        })
    }

    fn check_size(
        &self,
        kind: MediaKind,
        declared_len: Option<u64>,
        max_bytes: u64,
    ) -> Result<(), AppError> {
        match declared_len {
            Some(len) if len > max_bytes => Err(AppError::PayloadTooLarge(format!(
                "{} is {} bytes (max: {} bytes)",
                kind, len, max_bytes
            ))),
            _ => Ok(()),
        }
    }
}

/// Strip parameters (`; charset=...`) and lowercase the media type.
fn bare_media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}
