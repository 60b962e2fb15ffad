//! Router configuration for the image API.
//!
//! # Route Structure
//!
//! ```text
//! /health                       - Health check
//! /upload/                      - Upload (POST, multipart)
//! /rotate/{image_name}          - Rotate
//! /grayscale/{image_name}       - Grayscale
//! /resize/{image_name}          - Resize
//! /crop/{image_name}            - Crop
//! /filter/{image_name}          - Blur / sharpen
//! ```
//!
//! # Example
//!
//! ```ignore
//! use image_transformer::server::routes::{create_router, RouterConfig};
//! use image_transformer::service::ImageService;
//! use image_transformer::store::ImageStore;
//!
//! let service = ImageService::new(ImageStore::new("images"), ImageStore::new("processed"));
//! service.ensure_stores().await?;
//!
//! let router = create_router(service, RouterConfig::default());
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{
    crop_handler, filter_handler, grayscale_handler, health_handler, resize_handler,
    rotate_handler, upload_handler, AppState,
};
use crate::service::ImageService;

/// Default maximum upload body size (20 MiB).
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 20 * 1024 * 1024;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Whether to enable request tracing
    pub enable_tracing: bool,

    /// Maximum request body size for uploads, in bytes
    pub max_upload_size: usize,
}

impl Default for RouterConfig {
    /// Any CORS origin, tracing on, 20 MiB upload limit.
    fn default() -> Self {
        Self {
            cors_origins: None,
            enable_tracing: true,
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
        }
    }
}

impl RouterConfig {
    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }

    /// Set the maximum upload body size in bytes.
    pub fn with_max_upload_size(mut self, bytes: usize) -> Self {
        self.max_upload_size = bytes;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// Builds the complete Axum router with the upload and transform routes, the
/// health check, an upload body limit, CORS, and (optionally) request tracing.
pub fn create_router(service: ImageService, config: RouterConfig) -> Router {
    let app_state = AppState::new(service);
    let cors = build_cors_layer(&config);

    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/upload", post(upload_handler))
        .route("/upload/", post(upload_handler))
        .route("/rotate/{image_name}", get(rotate_handler))
        .route("/grayscale/{image_name}", get(grayscale_handler))
        .route("/resize/{image_name}", get(resize_handler))
        .route("/crop/{image_name}", get(crop_handler))
        .route("/filter/{image_name}", get(filter_handler))
        .layer(DefaultBodyLimit::max(config.max_upload_size))
        .with_state(app_state)
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .expose_headers([CONTENT_DISPOSITION])
        .max_age(Duration::from_secs(86400)); // 24 hours

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => cors,
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
