//! Thumbnail persistence strategies.
//!
//! Exactly one [`ThumbnailStore`] is built at startup from `THUMBNAIL_STRATEGY`
//! and injected into the thumbnail pipeline. Each strategy returns the URL
//! that goes into the video record's `thumbnail_url`.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;
use tubely_core::{MediaKind, Thumbnail, ThumbnailNaming, ThumbnailStrategy};
use uuid::Uuid;

use crate::keys::StorageKey;
use crate::traits::{StorageError, StorageResult};

#[async_trait]
pub trait ThumbnailStore: Send + Sync {
    /// Persist `thumbnail` for `video_id` and return its reference URL.
    async fn store(
        &self,
        video_id: Uuid,
        thumbnail: Thumbnail,
        extension: &'static str,
    ) -> StorageResult<String>;

    /// Bytes held in-process for `video_id`. Only the memory strategy keeps any.
    async fn get(&self, _video_id: Uuid) -> Option<Thumbnail> {
        None
    }

    fn strategy(&self) -> ThumbnailStrategy;
}

/// Writes thumbnails as files under the public assets directory.
pub struct FilesystemThumbnailStore {
    assets_root: PathBuf,
    public_base_url: String,
    naming: ThumbnailNaming,
}

impl FilesystemThumbnailStore {
    pub async fn new(
        assets_root: impl Into<PathBuf>,
        public_base_url: &str,
        naming: ThumbnailNaming,
    ) -> StorageResult<Self> {
        let assets_root = assets_root.into();
        tokio::fs::create_dir_all(&assets_root).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create assets directory {}: {}",
                assets_root.display(),
                e
            ))
        })?;
        Ok(Self {
            assets_root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            naming,
        })
    }

    fn file_name(&self, video_id: Uuid, extension: &'static str) -> StorageResult<String> {
        match self.naming {
            ThumbnailNaming::Random => Ok(StorageKey::for_thumbnail(extension)?.file_name()),
            ThumbnailNaming::VideoId => Ok(format!("{}.{}", video_id, extension)),
        }
    }

    /// Removes `{video_id}.{ext}` for every other thumbnail extension so a
    /// format change does not leave the previous file behind.
    async fn remove_stale_siblings(&self, video_id: Uuid, extension: &'static str) {
        let kind = MediaKind::Thumbnail;
        let stale = kind
            .allowed_content_types()
            .iter()
            .filter_map(|media_type| kind.extension_for(media_type))
            .filter(|ext| *ext != extension);

        for ext in stale {
            let path = self.assets_root.join(format!("{}.{}", video_id, ext));
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {
                    tracing::debug!(video_id = %video_id, path = %path.display(), "Removed stale thumbnail");
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(
                        video_id = %video_id,
                        path = %path.display(),
                        error = %e,
                        "Failed to remove stale thumbnail"
                    );
                }
            }
        }
    }
}

#[async_trait]
impl ThumbnailStore for FilesystemThumbnailStore {
    async fn store(
        &self,
        video_id: Uuid,
        thumbnail: Thumbnail,
        extension: &'static str,
    ) -> StorageResult<String> {
        let file_name = self.file_name(video_id, extension)?;
        let dest = self.assets_root.join(&file_name);

        let tmp = tempfile::NamedTempFile::new_in(&self.assets_root)?;
        tokio::fs::write(tmp.path(), &thumbnail.data).await?;
        tmp.persist(&dest).map_err(|e| StorageError::IoError(e.error))?;

        if self.naming == ThumbnailNaming::VideoId {
            self.remove_stale_siblings(video_id, extension).await;
        }

        tracing::debug!(
            video_id = %video_id,
            path = %dest.display(),
            size_bytes = thumbnail.len(),
            "Thumbnail written to assets directory"
        );

        Ok(format!("{}/assets/{}", self.public_base_url, file_name))
    }

    fn strategy(&self) -> ThumbnailStrategy {
        ThumbnailStrategy::Filesystem
    }
}

/// Embeds the thumbnail in the record as a `data:` URL.
pub struct DataUrlThumbnailStore {
    max_url_bytes: usize,
}

impl DataUrlThumbnailStore {
    pub fn new(max_url_bytes: usize) -> Self {
        Self { max_url_bytes }
    }
}

/// Length of `data:{mime};base64,{b64}` for a payload of `len` bytes.
fn data_url_len(media_type: &str, len: usize) -> usize {
    "data:".len() + media_type.len() + ";base64,".len() + len.div_ceil(3) * 4
}

#[async_trait]
impl ThumbnailStore for DataUrlThumbnailStore {
    async fn store(
        &self,
        video_id: Uuid,
        thumbnail: Thumbnail,
        _extension: &'static str,
    ) -> StorageResult<String> {
        let encoded_len = data_url_len(&thumbnail.media_type, thumbnail.len());
        if encoded_len > self.max_url_bytes {
            return Err(StorageError::TooLarge(format!(
                "Encoded thumbnail is {} bytes, limit is {} bytes",
                encoded_len, self.max_url_bytes
            )));
        }

        let url = format!(
            "data:{};base64,{}",
            thumbnail.media_type,
            STANDARD.encode(&thumbnail.data)
        );
        tracing::debug!(video_id = %video_id, size_bytes = url.len(), "Thumbnail encoded as data URL");
        Ok(url)
    }

    fn strategy(&self) -> ThumbnailStrategy {
        ThumbnailStrategy::DataUrl
    }
}

/// Process-lifetime thumbnail cache keyed by video id.
///
/// Not durable: every entry is lost on restart.
pub struct MemoryThumbnailStore {
    entries: RwLock<HashMap<Uuid, Thumbnail>>,
    public_base_url: String,
}

impl MemoryThumbnailStore {
    pub fn new(public_base_url: &str) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl ThumbnailStore for MemoryThumbnailStore {
    async fn store(
        &self,
        video_id: Uuid,
        thumbnail: Thumbnail,
        _extension: &'static str,
    ) -> StorageResult<String> {
        self.entries.write().await.insert(video_id, thumbnail);
        Ok(format!("{}/thumbnails/{}", self.public_base_url, video_id))
    }

    async fn get(&self, video_id: Uuid) -> Option<Thumbnail> {
        self.entries.read().await.get(&video_id).cloned()
    }

    fn strategy(&self) -> ThumbnailStrategy {
        ThumbnailStrategy::Memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn png(len: usize) -> Thumbnail {
        Thumbnail::new(Bytes::from(vec![0x89; len]), "image/png")
    }

    #[tokio::test]
    async fn test_filesystem_random_name() {
        let dir = tempfile::tempdir().unwrap();
        let store =
            FilesystemThumbnailStore::new(dir.path(), "http://localhost:8091/", ThumbnailNaming::Random)
                .await
                .unwrap();

        let url = store.store(Uuid::new_v4(), png(16), "png").await.unwrap();
        let file_name = url
            .strip_prefix("http://localhost:8091/assets/")
            .expect("asset url");
        assert!(file_name.ends_with(".png"));
        assert_eq!(std::fs::read(dir.path().join(file_name)).unwrap().len(), 16);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_filesystem_video_id_name() {
        let dir = tempfile::tempdir().unwrap();
        let store =
            FilesystemThumbnailStore::new(dir.path(), "http://localhost:8091", ThumbnailNaming::VideoId)
                .await
                .unwrap();
        let id = Uuid::new_v4();
        let url = store.store(id, png(4), "png").await.unwrap();
        assert_eq!(url, format!("http://localhost:8091/assets/{}.png", id));
        assert!(dir.path().join(format!("{}.png", id)).exists());
    }

    #[tokio::test]
    async fn test_filesystem_video_id_format_change_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let store =
            FilesystemThumbnailStore::new(dir.path(), "http://localhost:8091", ThumbnailNaming::VideoId)
                .await
                .unwrap();
        let id = Uuid::new_v4();
        store.store(id, png(4), "png").await.unwrap();

        let jpeg = Thumbnail::new(Bytes::from_static(b"\xff\xd8\xff"), "image/jpeg");
        let url = store.store(id, jpeg, "jpg").await.unwrap();

        assert_eq!(url, format!("http://localhost:8091/assets/{}.jpg", id));
        assert!(dir.path().join(format!("{}.jpg", id)).exists());
        assert!(!dir.path().join(format!("{}.png", id)).exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_data_url() {
        let store = DataUrlThumbnailStore::new(1024);
        let thumb = Thumbnail::new(Bytes::from_static(b"abc"), "image/jpeg");
        let url = store.store(Uuid::new_v4(), thumb, "jpg").await.unwrap();
        assert_eq!(url, "data:image/jpeg;base64,YWJj");
        assert_eq!(url.len(), data_url_len("image/jpeg", 3));
    }

    #[tokio::test]
    async fn test_data_url_too_large() {
        let store = DataUrlThumbnailStore::new(64);
        let err = store.store(Uuid::new_v4(), png(100), "png").await.unwrap_err();
        assert!(matches!(err, StorageError::TooLarge(_)));
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryThumbnailStore::new("http://localhost:8091");
        let id = Uuid::new_v4();
        assert!(store.get(id).await.is_none());

        let url = store.store(id, png(8), "png").await.unwrap();
        assert_eq!(url, format!("http://localhost:8091/thumbnails/{}", id));

        let held = store.get(id).await.unwrap();
        assert_eq!(held.media_type, "image/png");
        assert_eq!(held.len(), 8);
        assert_eq!(store.len().await, 1);
    }
}
