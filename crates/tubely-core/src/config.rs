//! Configuration module
//!
//! Process configuration is read once from the environment (optionally seeded
//! from a `.env` file) and validated before the server binds.

use std::env;
use std::path::PathBuf;

use crate::storage_types::{StorageBackend, ThumbnailNaming, ThumbnailStrategy};

const DEFAULT_PORT: u16 = 8091;
const MAX_VIDEO_SIZE_MB: u64 = 1024;
const MAX_THUMBNAIL_SIZE_MB: u64 = 10;
const THUMBNAIL_DATA_URL_MAX_BYTES: usize = 2 * 1024 * 1024;
const DB_MAX_CONNECTIONS: u32 = 10;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub jwt_secret: String,
    /// Absent means the in-memory video repository is used.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    // Object storage for videos
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub aws_region: Option<String>,
    pub local_storage_path: Option<PathBuf>,
    /// Base under which uploaded videos are reachable (CDN distribution domain).
    pub video_public_base_url: Option<String>,
    /// Base URL of this server, used for asset and in-memory thumbnail URLs.
    pub public_base_url: String,
    // Media processing
    pub staging_dir: PathBuf,
    pub ffprobe_path: String,
    pub ffmpeg_path: String,
    pub max_video_size_bytes: u64,
    pub max_thumbnail_size_bytes: u64,
    // Thumbnails
    pub thumbnail_strategy: ThumbnailStrategy,
    pub thumbnail_naming: ThumbnailNaming,
    pub assets_root: PathBuf,
    pub thumbnail_data_url_max_bytes: usize,
    pub log_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_PORT,
            environment: "development".to_string(),
            cors_origins: vec!["*".to_string()],
            jwt_secret: String::new(),
            database_url: None,
            db_max_connections: DB_MAX_CONNECTIONS,
            storage_backend: StorageBackend::Local,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            aws_region: None,
            local_storage_path: None,
            video_public_base_url: None,
            public_base_url: format!("http://localhost:{}", DEFAULT_PORT),
            staging_dir: env::temp_dir(),
            ffprobe_path: "ffprobe".to_string(),
            ffmpeg_path: "ffmpeg".to_string(),
            max_video_size_bytes: MAX_VIDEO_SIZE_MB * 1024 * 1024,
            max_thumbnail_size_bytes: MAX_THUMBNAIL_SIZE_MB * 1024 * 1024,
            thumbnail_strategy: ThumbnailStrategy::Filesystem,
            thumbnail_naming: ThumbnailNaming::Random,
            assets_root: PathBuf::from("./assets"),
            thumbnail_data_url_max_bytes: THUMBNAIL_DATA_URL_MAX_BYTES,
            log_format: "pretty".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        // .env is optional; real environment variables win
        let _ = dotenvy::dotenv();

        let defaults = Config::default();

        let environment = env::var("ENVIRONMENT").unwrap_or(defaults.environment);
        let server_port = match env::var("PORT") {
            Ok(port) => port
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            Err(_) => DEFAULT_PORT,
        };

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(s) => s.parse()?,
            Err(_) if env::var("S3_BUCKET").is_ok() => StorageBackend::S3,
            Err(_) => StorageBackend::Local,
        };

        let thumbnail_strategy = match env::var("THUMBNAIL_STRATEGY") {
            Ok(s) => s.parse()?,
            Err(_) => defaults.thumbnail_strategy,
        };
        let thumbnail_naming = match env::var("THUMBNAIL_NAMING") {
            Ok(s) => s.parse()?,
            Err(_) => defaults.thumbnail_naming,
        };

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| format!("http://localhost:{}", server_port));

        Ok(Config {
            server_port,
            environment,
            cors_origins,
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DB_MAX_CONNECTIONS),
            storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            aws_region: env::var("AWS_REGION").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok().map(PathBuf::from),
            video_public_base_url: env::var("VIDEO_PUBLIC_BASE_URL")
                .ok()
                .map(|s| s.trim_end_matches('/').to_string()),
            public_base_url,
            staging_dir: env::var("STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.staging_dir),
            ffprobe_path: env::var("FFPROBE_PATH").unwrap_or(defaults.ffprobe_path),
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or(defaults.ffmpeg_path),
            max_video_size_bytes: megabytes_to_bytes(
                "MAX_VIDEO_SIZE_MB",
                env::var("MAX_VIDEO_SIZE_MB")
                    .ok()
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(MAX_VIDEO_SIZE_MB),
            )?,
            max_thumbnail_size_bytes: megabytes_to_bytes(
                "MAX_THUMBNAIL_SIZE_MB",
                env::var("MAX_THUMBNAIL_SIZE_MB")
                    .ok()
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(MAX_THUMBNAIL_SIZE_MB),
            )?,
            thumbnail_strategy,
            thumbnail_naming,
            assets_root: env::var("ASSETS_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.assets_root),
            thumbnail_data_url_max_bytes: env::var("THUMBNAIL_DATA_URL_MAX_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(THUMBNAIL_DATA_URL_MAX_BYTES),
            log_format: env::var("LOG_FORMAT").unwrap_or(defaults.log_format),
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Region for the S3 backend, `S3_REGION` taking precedence over `AWS_REGION`.
    pub fn effective_s3_region(&self) -> Option<&str> {
        self.s3_region.as_deref().or(self.aws_region.as_deref())
    }

    /// Public base for uploaded videos. The local backend falls back to the
    /// `/media` route of this server.
    pub fn effective_video_public_base_url(&self) -> String {
        match &self.video_public_base_url {
            Some(base) => base.clone(),
            None => format!("{}/media", self.public_base_url),
        }
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if let Some(url) = &self.database_url {
            if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
                return Err(anyhow::anyhow!(
                    "DATABASE_URL must be a valid PostgreSQL connection string"
                ));
            }
        }

        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.max_video_size_bytes == 0 || self.max_thumbnail_size_bytes == 0 {
            return Err(anyhow::anyhow!(
                "MAX_VIDEO_SIZE_MB and MAX_THUMBNAIL_SIZE_MB must be greater than zero"
            ));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.effective_s3_region().is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
                if self.video_public_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "VIDEO_PUBLIC_BASE_URL must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}

fn megabytes_to_bytes(name: &str, megabytes: u64) -> Result<u64, anyhow::Error> {
    megabytes
        .checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("{} is too large: {} MB", name, megabytes))
}
