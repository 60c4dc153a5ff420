//! Common utilities for file upload handlers

use crate::error::multipart_error;
use axum::extract::multipart::Field;
use axum::http::{header::CONTENT_LENGTH, HeaderMap};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use tubely_core::AppError;
use uuid::Uuid;

/// Allowance for multipart boundaries and part headers on top of a file ceiling.
pub const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;

/// Parse a path segment as a video id.
pub fn parse_video_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::InvalidId(format!("Invalid video ID '{}'", raw)))
}

/// Request body size as declared by the client, less the multipart overhead
/// allowance. `None` when the header is absent or unparseable.
pub fn declared_file_len(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(|len| len.saturating_sub(MULTIPART_OVERHEAD_BYTES))
}

/// Body limit for a route whose file part may be up to `max_file_bytes`.
pub fn body_limit_for(max_file_bytes: u64) -> usize {
    usize::try_from(max_file_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES)).unwrap_or(usize::MAX)
}

/// Error for a form that ended without the field called `name`.
pub fn missing_field(name: &str) -> AppError {
    AppError::BadForm(format!("Missing form field '{}'", name))
}

/// Adapt a multipart field into a body stream with domain errors.
pub fn field_body<'a>(field: Field<'a>) -> impl Stream<Item = Result<Bytes, AppError>> + Send + 'a {
    field.map(|chunk| chunk.map_err(multipart_error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_parse_video_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_video_id(&id.to_string()).unwrap(), id);
        assert!(matches!(
            parse_video_id("not-a-uuid"),
            Err(AppError::InvalidId(_))
        ));
    }

    #[test]
    fn test_declared_file_len() {
        let mut headers = HeaderMap::new();
        assert_eq!(declared_file_len(&headers), None);

        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("1000"));
        assert_eq!(declared_file_len(&headers), Some(0));

        headers.insert(
            CONTENT_LENGTH,
            HeaderValue::from_str(&(MULTIPART_OVERHEAD_BYTES + 500).to_string()).unwrap(),
        );
        assert_eq!(declared_file_len(&headers), Some(500));
    }

    #[test]
    fn test_missing_field_is_bad_form() {
        let err = missing_field("video");
        assert!(matches!(err, AppError::BadForm(msg) if msg.contains("'video'")));
    }

    #[test]
    fn test_body_limit_for() {
        assert_eq!(body_limit_for(10), 10 + MULTIPART_OVERHEAD_BYTES as usize);
        assert_eq!(body_limit_for(u64::MAX), usize::MAX);
    }
}
