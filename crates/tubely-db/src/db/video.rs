use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres};
use tubely_core::VideoAsset;
use uuid::Uuid;

use super::{RepositoryError, RepositoryResult, VideoRepository};

const VIDEO_COLUMNS: &str =
    "id, user_id, title, description, thumbnail_url, video_url, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct VideoRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    description: String,
    thumbnail_url: Option<String>,
    video_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<VideoRow> for VideoAsset {
    fn from(row: VideoRow) -> Self {
        VideoAsset {
            id: row.id,
            owner_id: row.user_id,
            title: row.title,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
            thumbnail_url: row.thumbnail_url,
            video_url: row.video_url,
        }
    }
}

/// Repository for video records stored in Postgres
#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply the embedded migrations.
    pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(pool).await
    }
}

#[async_trait]
impl VideoRepository for PgVideoRepository {
    #[tracing::instrument(skip(self, video), fields(db.table = "videos", db.operation = "insert", db.record_id = %video.id))]
    async fn create(&self, video: &VideoAsset) -> RepositoryResult<VideoAsset> {
        let row = sqlx::query_as::<Postgres, VideoRow>(&format!(
            r#"
            INSERT INTO videos (id, user_id, title, description, thumbnail_url, video_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            VIDEO_COLUMNS
        ))
        .bind(video.id)
        .bind(video.owner_id)
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.thumbnail_url)
        .bind(&video.video_url)
        .bind(video.created_at)
        .bind(video.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select", db.record_id = %id))]
    async fn get(&self, id: Uuid) -> RepositoryResult<Option<VideoAsset>> {
        let row = sqlx::query_as::<Postgres, VideoRow>(&format!(
            "SELECT {} FROM videos WHERE id = $1",
            VIDEO_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    #[tracing::instrument(skip(self, video), fields(db.table = "videos", db.operation = "update", db.record_id = %video.id))]
    async fn update(&self, video: &VideoAsset) -> RepositoryResult<VideoAsset> {
        let row = sqlx::query_as::<Postgres, VideoRow>(&format!(
            r#"
            UPDATE videos
            SET title = $2, description = $3, thumbnail_url = $4, video_url = $5, updated_at = $6
            WHERE id = $1
            RETURNING {}
            "#,
            VIDEO_COLUMNS
        ))
        .bind(video.id)
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.thumbnail_url)
        .bind(&video.video_url)
        .bind(video.updated_at)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Into::into)
            .ok_or(RepositoryError::NotFound(video.id))
    }
}
