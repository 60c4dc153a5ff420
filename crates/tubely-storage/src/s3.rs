use crate::traits::{validate_key, ObjectStorage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use object_store::aws::AmazonS3Builder;
use object_store::buffered::BufWriter;
use object_store::path::Path as ObjectPath;
use object_store::{Attribute, Attributes, ObjectStore};
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

/// S3 storage implementation
///
/// Files are streamed from disk through a multipart upload; a failed upload is
/// aborted so no partial object remains.
#[derive(Clone)]
pub struct S3Storage {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    public_base_url: String,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    /// * `public_base_url` - Base of public object URLs, usually a CDN distribution
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        public_base_url: String,
    ) -> StorageResult<Self> {
        // Credentials come from the standard AWS environment variables.
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region)
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(Self::with_store(Arc::new(store), bucket, public_base_url))
    }

    /// Wrap an existing object store (e.g. `object_store::memory::InMemory` in tests).
    pub fn with_store(
        store: Arc<dyn ObjectStore>,
        bucket: String,
        public_base_url: String,
    ) -> Self {
        S3Storage {
            store,
            bucket,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn put_file(
        &self,
        key: &str,
        path: &Path,
        content_length: u64,
        content_type: &str,
    ) -> StorageResult<()> {
        validate_key(key)?;

        let start = std::time::Instant::now();
        let location = ObjectPath::from(key);

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());

        let mut writer =
            BufWriter::new(Arc::clone(&self.store), location).with_attributes(attributes);

        let mut file = tokio::fs::File::open(path).await?;

        let copied = tokio::io::copy(&mut file, &mut writer).await;
        let result = match copied {
            Ok(_) => writer.shutdown().await,
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            if let Err(abort_err) = writer.abort().await {
                tracing::warn!(
                    error = %abort_err,
                    bucket = %self.bucket,
                    key = %key,
                    "Failed to abort S3 multipart upload"
                );
            }
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                size_bytes = content_length,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            return Err(StorageError::UploadFailed(e.to_string()));
        }

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            content_type = %content_type,
            size_bytes = content_length,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_store::memory::InMemory;
    use object_store::ObjectStoreExt;
    use std::io::Write;

    #[tokio::test]
    async fn test_put_file_streams_into_store() {
        let memory = Arc::new(InMemory::new());
        let storage = S3Storage::with_store(
            memory.clone(),
            "tubely".to_string(),
            "https://d111.cloudfront.net/".to_string(),
        );

        let mut staged = tempfile::NamedTempFile::new().unwrap();
        staged.write_all(b"not really an mp4").unwrap();

        storage
            .put_file("landscape/abc.mp4", staged.path(), 17, "video/mp4")
            .await
            .unwrap();

        let stored = memory
            .get(&ObjectPath::from("landscape/abc.mp4"))
            .await
            .unwrap();
        assert_eq!(
            stored
                .attributes
                .get(&Attribute::ContentType)
                .map(AsRef::<str>::as_ref),
            Some("video/mp4")
        );
        assert_eq!(stored.bytes().await.unwrap().as_ref(), b"not really an mp4");
        assert_eq!(
            storage.public_url("landscape/abc.mp4"),
            "https://d111.cloudfront.net/landscape/abc.mp4"
        );
    }

    #[tokio::test]
    async fn test_put_file_rejects_traversal_key() {
        let storage = S3Storage::with_store(
            Arc::new(InMemory::new()),
            "tubely".to_string(),
            "https://cdn.example.com".to_string(),
        );
        let staged = tempfile::NamedTempFile::new().unwrap();
        let err = storage
            .put_file("../x.mp4", staged.path(), 0, "video/mp4")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }
}
