use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A video record owned by the datastore.
///
/// `video_url` and `thumbnail_url` are only rewritten once the corresponding
/// upload (or local store write) has succeeded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoAsset {
    pub id: Uuid,
    #[serde(rename = "user_id")]
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
}

impl VideoAsset {
    pub fn new(owner_id: Uuid, title: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            title: title.into(),
            description: description.into(),
            created_at: now,
            updated_at: now,
            thumbnail_url: None,
            video_url: None,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }
}
