#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::thumbnail::{
    DataUrlThumbnailStore, FilesystemThumbnailStore, MemoryThumbnailStore, ThumbnailStore,
};
use crate::{ObjectStorage, StorageBackend, StorageError, StorageResult};
use std::sync::Arc;
use tubely_core::{Config, ThumbnailStrategy};

/// Create the video storage backend based on configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn ObjectStorage>> {
    match config.storage_backend {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket
                .clone()
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config
                .effective_s3_region()
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
                })?;
            let public_base_url = config.video_public_base_url.clone().ok_or_else(|| {
                StorageError::ConfigError("VIDEO_PUBLIC_BASE_URL not configured".to_string())
            })?;

            let storage =
                S3Storage::new(bucket, region, config.s3_endpoint.clone(), public_base_url).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config.local_storage_path.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;

            let storage =
                LocalStorage::new(base_path, config.effective_video_public_base_url()).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}

/// Create the single thumbnail store selected by `THUMBNAIL_STRATEGY`
pub async fn create_thumbnail_store(config: &Config) -> StorageResult<Arc<dyn ThumbnailStore>> {
    let store: Arc<dyn ThumbnailStore> = match config.thumbnail_strategy {
        ThumbnailStrategy::Filesystem => Arc::new(
            FilesystemThumbnailStore::new(
                config.assets_root.clone(),
                &config.public_base_url,
                config.thumbnail_naming,
            )
            .await?,
        ),
        ThumbnailStrategy::DataUrl => {
            Arc::new(DataUrlThumbnailStore::new(config.thumbnail_data_url_max_bytes))
        }
        ThumbnailStrategy::Memory => {
            tracing::warn!("In-memory thumbnail store selected; thumbnails are lost on restart");
            Arc::new(MemoryThumbnailStore::new(&config.public_base_url))
        }
    };
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_backend_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            local_storage_path: Some(dir.path().to_path_buf()),
            ..Config::default()
        };
        let storage = create_storage(&config).await.unwrap();
        assert_eq!(storage.backend_type(), StorageBackend::Local);
        assert_eq!(
            storage.public_url("other/x.mp4"),
            "http://localhost:8091/media/other/x.mp4"
        );
    }

    #[tokio::test]
    async fn test_thumbnail_strategy_selection() {
        let config = Config {
            thumbnail_strategy: ThumbnailStrategy::DataUrl,
            ..Config::default()
        };
        let store = create_thumbnail_store(&config).await.unwrap();
        assert_eq!(store.strategy(), ThumbnailStrategy::DataUrl);

        let config = Config {
            thumbnail_strategy: ThumbnailStrategy::Memory,
            ..Config::default()
        };
        let store = create_thumbnail_store(&config).await.unwrap();
        assert_eq!(store.strategy(), ThumbnailStrategy::Memory);
    }
}
