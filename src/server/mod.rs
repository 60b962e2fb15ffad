//! HTTP server layer.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │   POST /upload/      GET /{rotate,grayscale,...}/{image_name}   │
//! │                                                                 │
//! │  ┌──────────────────────────┐  ┌─────────────────────────────┐  │
//! │  │        handlers          │  │           routes            │  │
//! │  │ (requests, error JSON)   │  │ (router, CORS, body limit)  │  │
//! │  └──────────────────────────┘  └─────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    content_disposition, crop_handler, filter_handler, grayscale_handler, health_handler,
    resize_handler, rotate_handler, upload_handler, AppState, CropQueryParams, ErrorResponse,
    FilterQueryParams, HealthResponse, InfoResponse, ResizeQueryParams, RotateQueryParams,
    IMAGE_FIELD,
};
pub use routes::{create_router, RouterConfig, DEFAULT_MAX_UPLOAD_SIZE};
