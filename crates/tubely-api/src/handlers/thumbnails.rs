use crate::auth::AuthUser;
use crate::error::{multipart_error, HttpAppError};
use crate::services::IncomingFile;
use crate::state::AppState;
use crate::utils::upload::{declared_file_len, field_body, missing_field, parse_video_id};
use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tubely_core::{AppError, MediaKind, VideoAsset};

/// `POST /videos/{video_id}/thumbnail`: multipart field `thumbnail`.
pub async fn upload_thumbnail(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    user: AuthUser,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<VideoAsset>, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    tracing::debug!(video_id = %video_id, user_id = %user.user_id, "Uploading thumbnail");

    let video = state
        .thumbnails
        .records()
        .authorize(video_id, user.user_id)
        .await?;

    let field_name = MediaKind::Thumbnail.form_field();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(field_name) {
            tracing::debug!(field = ?field.name(), "Skipping multipart field");
            continue;
        }

        let file = IncomingFile::new(
            field.content_type().map(str::to_string),
            declared_file_len(&headers),
            field_body(field),
        );
        let updated = state.thumbnails.ingest(video, file).await?;
        return Ok(Json(updated));
    }

    Err(missing_field(field_name).into())
}

/// `GET /thumbnails/{video_id}`: bytes held by the in-memory strategy.
pub async fn get_thumbnail(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> Result<Response, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;

    let thumbnail = state.thumbnails.cached(video_id).await.ok_or_else(|| {
        AppError::NotFound(format!("Thumbnail for video {} not found", video_id))
    })?;

    Ok((
        [(header::CONTENT_TYPE, thumbnail.media_type)],
        thumbnail.data,
    )
        .into_response())
}
