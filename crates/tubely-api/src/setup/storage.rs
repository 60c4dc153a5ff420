//! Storage setup and initialization

use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::Config;
use tubely_storage::{create_storage, create_thumbnail_store, ObjectStorage, ThumbnailStore};

/// Build the video object storage and the thumbnail store.
pub async fn setup_storage(
    config: &Config,
) -> Result<(Arc<dyn ObjectStorage>, Arc<dyn ThumbnailStore>)> {
    tracing::info!("Initializing storage...");
    let storage = create_storage(config)
        .await
        .context("Failed to initialize video storage")?;
    let thumbnail_store = create_thumbnail_store(config)
        .await
        .context("Failed to initialize thumbnail store")?;

    tracing::info!(
        backend = %storage.backend_type(),
        thumbnail_strategy = %thumbnail_store.strategy(),
        "Storage initialized successfully"
    );

    Ok((storage, thumbnail_store))
}
