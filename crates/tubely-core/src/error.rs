//! Error types module
//!
//! Every failure the ingestion pipelines can report is a variant of [`AppError`].
//! Variants fall into two families:
//!
//! - client errors (`InvalidId`, `Unauthenticated`, `Unauthorized`, `NotFound`,
//!   `UnsupportedMediaType`, `PayloadTooLarge`, `BadForm`) map to 4xx and are never retried
//!   (validation failures, oversize bodies included, are 400);
//! - dependency failures (`Probe`, `NoStreamsFound`, `Transcode`, `StoreUpload`,
//!   `RecordPersist`, `Io`, `Internal`) map to 500 and are logged with detail.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
/// This trait allows errors to self-describe their HTTP response characteristics
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "STORE_UPLOAD_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried by resubmitting)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid ID: {0}")]
    InvalidId(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Bad form: {0}")]
    BadForm(String),

    #[error("Probe error: {0}")]
    Probe(String),

    #[error("No video streams found")]
    NoStreamsFound,

    #[error("Transcode error: {0}")]
    Transcode(String),

    #[error("Storage upload error: {0}")]
    StoreUpload(String),

    #[error("Record persist error: {0}")]
    RecordPersist(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::InvalidId(format!("UUID parsing error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::InvalidId(_) => (
            400,
            "INVALID_ID",
            false,
            Some("Check the video ID in the request path"),
            false,
            LogLevel::Debug,
        ),
        AppError::Unauthenticated(_) => (
            401,
            "UNAUTHENTICATED",
            false,
            Some("Provide a valid bearer token"),
            false,
            LogLevel::Debug,
        ),
        AppError::Unauthorized(_) => (
            401,
            "UNAUTHORIZED",
            false,
            Some("Only the owner of a video can upload media for it"),
            false,
            LogLevel::Warn,
        ),
        AppError::NotFound(_) => (
            404,
            "NOT_FOUND",
            false,
            Some("Verify the resource ID exists"),
            false,
            LogLevel::Debug,
        ),
        AppError::UnsupportedMediaType(_) => (
            400,
            "UNSUPPORTED_MEDIA_TYPE",
            false,
            Some("Upload a file with a supported content type"),
            false,
            LogLevel::Debug,
        ),
        AppError::PayloadTooLarge(_) => (
            400,
            "PAYLOAD_TOO_LARGE",
            false,
            Some("Reduce file size and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::BadForm(_) => (
            400,
            "BAD_FORM",
            false,
            Some("Check the multipart form fields and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::Probe(_) => (
            500,
            "PROBE_ERROR",
            true,
            Some("Check the file is a valid video and resubmit"),
            true,
            LogLevel::Error,
        ),
        AppError::NoStreamsFound => (
            500,
            "NO_STREAMS_FOUND",
            false,
            Some("Upload a file containing a video stream"),
            false,
            LogLevel::Error,
        ),
        AppError::Transcode(_) => (
            500,
            "TRANSCODE_ERROR",
            true,
            Some("Resubmit the upload"),
            true,
            LogLevel::Error,
        ),
        AppError::StoreUpload(_) => (
            500,
            "STORE_UPLOAD_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::RecordPersist(_) => (
            500,
            "RECORD_PERSIST_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::Io(_) => (
            500,
            "IO_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::InvalidId(_) => "InvalidId",
            AppError::Unauthenticated(_) => "Unauthenticated",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::NotFound(_) => "NotFound",
            AppError::UnsupportedMediaType(_) => "UnsupportedMediaType",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::BadForm(_) => "BadForm",
            AppError::Probe(_) => "ProbeError",
            AppError::NoStreamsFound => "NoStreamsFound",
            AppError::Transcode(_) => "TranscodeError",
            AppError::StoreUpload(_) => "StoreUploadError",
            AppError::RecordPersist(_) => "RecordPersistError",
            AppError::Io(_) => "IOError",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Whether this error belongs to the client-error family (4xx, never retried).
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.http_status_code())
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidId(ref msg) => msg.clone(),
            AppError::Unauthenticated(ref msg) => msg.clone(),
            AppError::Unauthorized(ref msg) => msg.clone(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::UnsupportedMediaType(ref msg) => msg.clone(),
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::BadForm(ref msg) => msg.clone(),
            AppError::Probe(_) => "Failed to inspect video".to_string(),
            AppError::NoStreamsFound => "No video streams found".to_string(),
            AppError::Transcode(_) => "Failed to process video for fast start".to_string(),
            AppError::StoreUpload(_) => "Failed to upload file to storage".to_string(),
            AppError::RecordPersist(_) => "Failed to update video record".to_string(),
            AppError::Io(_) => "Failed to write file".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_are_4xx_and_not_recoverable() {
        let errors = [
            AppError::InvalidId("bad".to_string()),
            AppError::Unauthenticated("no token".to_string()),
            AppError::Unauthorized("not owner".to_string()),
            AppError::NotFound("missing".to_string()),
            AppError::UnsupportedMediaType("image/gif".to_string()),
            AppError::PayloadTooLarge("too big".to_string()),
            AppError::BadForm("no field".to_string()),
        ];
        for err in errors {
            assert!(err.is_client_error(), "{} should be a client error", err);
            assert!(!err.is_recoverable());
            assert!(!err.is_sensitive());
        }
    }

    #[test]
    fn test_oversize_is_a_validation_failure() {
        let err = AppError::PayloadTooLarge("video is 2048 bytes (max: 1024 bytes)".to_string());
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "PAYLOAD_TOO_LARGE");
        assert_eq!(
            err.http_status_code(),
            AppError::UnsupportedMediaType(String::new()).http_status_code()
        );
    }

    #[test]
    fn test_dependency_failures_are_500() {
        let errors = [
            AppError::Probe("exit 1".to_string()),
            AppError::NoStreamsFound,
            AppError::Transcode("moov atom not found".to_string()),
            AppError::StoreUpload("timeout".to_string()),
            AppError::RecordPersist("pool closed".to_string()),
            AppError::Io("disk full".to_string()),
        ];
        for err in errors {
            assert_eq!(err.http_status_code(), 500);
            assert!(!err.is_client_error());
            assert_eq!(err.log_level(), LogLevel::Error);
        }
    }

    #[test]
    fn test_record_persist_is_surfaced_distinctly() {
        let err = AppError::RecordPersist("connection reset".to_string());
        assert_eq!(err.error_code(), "RECORD_PERSIST_ERROR");
        assert_ne!(
            err.error_code(),
            AppError::StoreUpload(String::new()).error_code()
        );
        assert_eq!(err.error_type(), "RecordPersistError");
    }

    #[test]
    fn test_transcode_hides_tool_output_from_client() {
        let err = AppError::Transcode("[mov,mp4] moov atom not found".to_string());
        assert!(err.is_sensitive());
        assert!(!err.client_message().contains("moov"));
        assert!(err.detailed_message().contains("moov"));
    }

    #[test]
    fn test_io_error_conversion() {
        let err = AppError::from(io::Error::other("disk full"));
        assert_eq!(err.error_code(), "IO_ERROR");
        assert!(err.to_string().contains("disk full"));
    }
}
