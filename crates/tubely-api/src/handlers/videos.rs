use crate::auth::AuthUser;
use crate::error::{multipart_error, HttpAppError};
use crate::services::IncomingFile;
use crate::state::AppState;
use crate::utils::upload::{declared_file_len, field_body, missing_field, parse_video_id};
use axum::{
    extract::{Multipart, Path, State},
    http::HeaderMap,
    Json,
};
use std::sync::Arc;
use tubely_core::{MediaKind, VideoAsset};

/// `POST /videos/{video_id}`: multipart field `video`.
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    user: AuthUser,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<VideoAsset>, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    tracing::debug!(video_id = %video_id, user_id = %user.user_id, "Uploading video");

    let video = state
        .videos
        .records()
        .authorize(video_id, user.user_id)
        .await?;

    let field_name = MediaKind::Video.form_field();
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
        let updated = state.videos.ingest(video, file).await?;
        return Ok(Json(updated));
    }

    Err(missing_field(field_name).into())
}
