//! Router assembly

use crate::auth::middleware::{auth_middleware, AuthState};
use crate::auth::JwtValidator;
use crate::handlers::{health, thumbnails, videos};
use crate::state::AppState;
use crate::utils::upload::body_limit_for;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tubely_core::{Config, StorageBackend, ThumbnailStrategy};

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;
    let auth_state = Arc::new(AuthState {
        validator: JwtValidator::new(&config.jwt_secret),
    });

    let video_limit = body_limit_for(state.videos.max_bytes());
    let thumbnail_limit = body_limit_for(state.thumbnails.max_bytes());

    // Upload routes require a bearer token
    let protected_routes = Router::new()
        .route(
            "/videos/{video_id}",
            post(videos::upload_video).layer(DefaultBodyLimit::max(video_limit)),
        )
        .route(
            "/videos/{video_id}/thumbnail",
            post(thumbnails::upload_thumbnail).layer(DefaultBodyLimit::max(thumbnail_limit)),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ));

    let mut public_routes = Router::new().route("/health", get(health::health_check));
    if state.thumbnails.strategy() == ThumbnailStrategy::Memory {
        public_routes =
            public_routes.route("/thumbnails/{video_id}", get(thumbnails::get_thumbnail));
    }

    let mut app = public_routes.merge(protected_routes).with_state(state);

    if config.thumbnail_strategy == ThumbnailStrategy::Filesystem {
        tracing::info!(assets_root = %config.assets_root.display(), "Serving /assets");
        app = app.nest_service("/assets", ServeDir::new(&config.assets_root));
    }

    if config.storage_backend == StorageBackend::Local {
        if let Some(path) = &config.local_storage_path {
            tracing::info!(local_storage_path = %path.display(), "Serving /media");
            app = app.nest_service("/media", ServeDir::new(path));
        }
    }

    Ok(app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors),
    ))
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|_| anyhow::anyhow!("Invalid CORS origin: {}", o))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
