#![allow(dead_code)]

pub mod auth;
pub mod fixtures;

use axum_test::TestServer;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tubely_api::setup::routes::setup_routes;
use tubely_api::setup::services::{initialize_services, Components};
use tubely_core::{Config, ThumbnailStrategy, VideoAsset};
use tubely_db::{InMemoryVideoRepository, VideoRepository};
use tubely_processing::testing::{CopyRemuxer, FixedProber};
use tubely_processing::{Prober, Remuxer};
use tubely_storage::testing::RecordingStorage;
use uuid::Uuid;

pub const PUBLIC_BASE_URL: &str = "http://localhost:8091";
pub const VIDEO_BASE_URL: &str = "https://cdn.example.com";

/// Test application state
pub struct TestApp {
    pub server: TestServer,
    pub repository: Arc<InMemoryVideoRepository>,
    pub storage: Arc<RecordingStorage>,
    pub config: Config,
    pub _temp_dir: TempDir,
}

impl TestApp {
    /// Get the HTTP test client
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn staging_dir(&self) -> &Path {
        &self.config.staging_dir
    }

    pub fn assets_dir(&self) -> &Path {
        &self.config.assets_root
    }

    /// Number of files left in the staging directory.
    pub fn staged_files(&self) -> usize {
        std::fs::read_dir(self.staging_dir())
            .expect("staging dir exists")
            .count()
    }

    /// Insert a video record owned by `owner`.
    pub async fn seed_video(&self, owner: Uuid) -> VideoAsset {
        let video = VideoAsset::new(owner, "Boots", "A video about boots");
        self.repository
            .create(&video)
            .await
            .expect("Failed to seed video")
    }

    pub async fn stored_video(&self, id: Uuid) -> VideoAsset {
        self.repository
            .get(id)
            .await
            .expect("Failed to read video")
            .expect("Video missing")
    }
}

/// Builder for a [`TestApp`] wired with fakes.
pub struct TestAppBuilder {
    prober: Arc<dyn Prober>,
    remuxer: Arc<dyn Remuxer>,
    storage: RecordingStorage,
    thumbnail_strategy: ThumbnailStrategy,
    max_video_size_bytes: u64,
    max_thumbnail_size_bytes: u64,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self {
            prober: Arc::new(FixedProber::new(1920, 1080)),
            remuxer: Arc::new(CopyRemuxer),
            storage: RecordingStorage::new(VIDEO_BASE_URL),
            thumbnail_strategy: ThumbnailStrategy::Memory,
            max_video_size_bytes: 1024 * 1024,
            max_thumbnail_size_bytes: 64 * 1024,
        }
    }
}

impl TestAppBuilder {
    pub fn prober(mut self, prober: impl Prober + 'static) -> Self {
        self.prober = Arc::new(prober);
        self
    }

    pub fn remuxer(mut self, remuxer: impl Remuxer + 'static) -> Self {
        self.remuxer = Arc::new(remuxer);
        self
    }

    pub fn storage(mut self, storage: RecordingStorage) -> Self {
        self.storage = storage;
        self
    }

    pub fn thumbnail_strategy(mut self, strategy: ThumbnailStrategy) -> Self {
        self.thumbnail_strategy = strategy;
        self
    }

    pub fn max_video_size_bytes(mut self, max: u64) -> Self {
        self.max_video_size_bytes = max;
        self
    }

    pub async fn build(self) -> TestApp {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");

        let config = Config {
            jwt_secret: auth::TEST_JWT_SECRET.to_string(),
            public_base_url: PUBLIC_BASE_URL.to_string(),
            video_public_base_url: Some(VIDEO_BASE_URL.to_string()),
            staging_dir: temp_dir.path().join("staging"),
            assets_root: temp_dir.path().join("assets"),
            thumbnail_strategy: self.thumbnail_strategy,
            max_video_size_bytes: self.max_video_size_bytes,
            max_thumbnail_size_bytes: self.max_thumbnail_size_bytes,
            thumbnail_data_url_max_bytes: 1024 * 1024,
            ..Config::default()
        };

        let repository = Arc::new(InMemoryVideoRepository::new());
        let storage = Arc::new(self.storage);
        let thumbnail_store = tubely_storage::create_thumbnail_store(&config)
            .await
            .expect("Failed to create thumbnail store");

        let components = Components {
            repository: repository.clone(),
            storage: storage.clone(),
            thumbnail_store,
            prober: self.prober,
            remuxer: self.remuxer,
        };
        let state = initialize_services(&config, components)
            .await
            .expect("Failed to initialize services");
        let router = setup_routes(&config, state).expect("Failed to build routes");

        TestApp {
            server: TestServer::new(router).expect("Failed to create test server"),
            repository,
            storage,
            config,
            _temp_dir: temp_dir,
        }
    }
}

/// Setup a test application with the default fakes
pub async fn setup_test_app() -> TestApp {
    TestAppBuilder::default().build().await
}
