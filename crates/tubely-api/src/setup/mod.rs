//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod services;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::Config;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(&config.log_format)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment,
        storage_backend = %config.storage_backend,
        thumbnail_strategy = %config.thumbnail_strategy,
        "Configuration loaded and validated successfully"
    );

    let repository = database::setup_database(&config).await?;
    let (storage, thumbnail_store) = storage::setup_storage(&config).await?;

    let components = services::Components::from_config(&config, repository, storage, thumbnail_store);
    let state = services::initialize_services(&config, components).await?;

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
