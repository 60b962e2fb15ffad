//! HTTP request handlers for the image API.
//!
//! # Endpoints
//!
//! - `POST /upload/` - Upload a JPEG or PNG image (multipart field `image`)
//! - `GET /rotate/{image_name}?degrees=90` - Rotate counter-clockwise
//! - `GET /grayscale/{image_name}` - Convert to grayscale
//! - `GET /resize/{image_name}?width=W&height=H` - Stretch to exact size
//! - `GET /crop/{image_name}?left=L&top=T&right=R&bottom=B` - Crop to box
//! - `GET /filter/{image_name}?filter_type=blur|sharpen` - Apply a filter
//! - `GET /health` - Health check endpoint
//!
//! Expected failures (bad upload, missing image, unsupported filter) are
//! answered with `200 OK` and a `{"error": "..."}` body; clients detect them
//! by the payload shape, not the status code.

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::error::{TransformError, UploadError};
use crate::service::{ImageService, ImageUpload, TransformedImage};
use crate::transform::{Transform, DEFAULT_FILTER_TYPE, DEFAULT_ROTATION_DEGREES};

/// Multipart field carrying the uploaded file.
pub const IMAGE_FIELD: &str = "image";

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the image service.
///
/// This is passed to all handlers via Axum's State extractor.
#[derive(Clone)]
pub struct AppState {
    /// Upload and transform pipeline
    pub service: Arc<ImageService>,
}

impl AppState {
    /// Create a new application state around the given service.
    pub fn new(service: ImageService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

// =============================================================================
// Request Parameters
// =============================================================================

/// Query parameters for rotate requests.
#[derive(Debug, Deserialize)]
pub struct RotateQueryParams {
    /// Counter-clockwise rotation in degrees (defaults to 90)
    #[serde(default = "default_degrees")]
    pub degrees: i32,
}

fn default_degrees() -> i32 {
    DEFAULT_ROTATION_DEGREES
}

/// Query parameters for resize requests.
#[derive(Debug, Deserialize)]
pub struct ResizeQueryParams {
    pub width: u32,
    pub height: u32,
}

/// Query parameters for crop requests. Edges are pixel coordinates.
#[derive(Debug, Deserialize)]
pub struct CropQueryParams {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

/// Query parameters for filter requests.
#[derive(Debug, Deserialize)]
pub struct FilterQueryParams {
    /// `blur` or `sharpen`, any case (defaults to `blur`)
    #[serde(default = "default_filter_type")]
    pub filter_type: String,
}

fn default_filter_type() -> String {
    DEFAULT_FILTER_TYPE.to_string()
}

// =============================================================================
// Response Types
// =============================================================================

/// Success payload for uploads.
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub info: String,
}

/// Structured error payload.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert UploadError to HTTP response.
///
/// Upload failures are always reported with `200 OK`. Client mistakes are
/// logged at WARN, storage faults at ERROR.
impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        match &self {
            UploadError::Store(_) | UploadError::Internal(_) => {
                error!(error_type = "upload_failed", "Upload failed: {}", self);
            }
            UploadError::UnsupportedContentType { content_type } => {
                warn!(
                    error_type = "invalid_content_type",
                    content_type = content_type.as_deref().unwrap_or("<none>"),
                    "Rejected upload: {}",
                    self
                );
            }
            _ => {
                warn!(error_type = "invalid_upload", "Rejected upload: {}", self);
            }
        }

        (StatusCode::OK, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

/// Convert TransformError to HTTP response.
///
/// - Missing images and bad parameters return `200 OK` with an error payload
///   (not-found logged at DEBUG, the rest at WARN)
/// - Decode, encode and storage faults return `500` and are logged at ERROR
impl IntoResponse for TransformError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::OK
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        match &self {
            TransformError::NotFound { name } => {
                debug!(error_type = "not_found", name = %name, "Image not found");
            }
            err if err.is_client_error() => {
                warn!(error_type = "invalid_request", "Client error: {}", err);
            }
            err => {
                error!(
                    error_type = "transform_failed",
                    status = status.as_u16(),
                    "Server error: {}",
                    err
                );
            }
        }

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle image uploads.
///
/// # Endpoint
///
/// `POST /upload/` with a `multipart/form-data` body whose `image` field holds
/// the file.
///
/// # Response
///
/// Always `200 OK`, with either
/// ```json
/// { "info": "Image 'photo.jpg' uploaded successfully" }
/// ```
/// or
/// ```json
/// { "error": "Invalid image format. Only JPEG and PNG are supported." }
/// ```
pub async fn upload_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<InfoResponse>, UploadError> {
    let mut multipart = multipart.map_err(|e| UploadError::Multipart(e.body_text()))?;

    let upload = read_image_field(&mut multipart).await?;
    let receipt = state.service.upload(upload).await?;

    Ok(Json(InfoResponse {
        info: receipt.info(),
    }))
}

/// Pull the `image` field out of a multipart body, skipping other fields.
async fn read_image_field(multipart: &mut Multipart) -> Result<ImageUpload, UploadError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::Multipart(e.to_string()))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| UploadError::Multipart(e.to_string()))?;

        return Ok(ImageUpload {
            filename,
            content_type,
            data,
        });
    }

    Err(UploadError::MissingFile)
}

/// Handle rotate requests.
///
/// `GET /rotate/{image_name}?degrees=<int>`; the canvas grows to fit the
/// rotated image. Responds with `rotated_<degrees>_<name>` as an attachment.
pub async fn rotate_handler(
    State(state): State<AppState>,
    Path(image_name): Path<String>,
    Query(query): Query<RotateQueryParams>,
) -> Result<Response, TransformError> {
    let transform = Transform::Rotate {
        degrees: query.degrees,
    };
    run_transform(&state, &image_name, transform).await
}

/// Handle grayscale requests.
///
/// `GET /grayscale/{image_name}`. Responds with `grayscale_<name>`.
pub async fn grayscale_handler(
    State(state): State<AppState>,
    Path(image_name): Path<String>,
) -> Result<Response, TransformError> {
    run_transform(&state, &image_name, Transform::Grayscale).await
}

/// Handle resize requests.
///
/// `GET /resize/{image_name}?width=<int>&height=<int>`, both required.
/// Responds with `resized_<width>x<height>_<name>`.
pub async fn resize_handler(
    State(state): State<AppState>,
    Path(image_name): Path<String>,
    Query(query): Query<ResizeQueryParams>,
) -> Result<Response, TransformError> {
    let transform = Transform::Resize {
        width: query.width,
        height: query.height,
    };
    run_transform(&state, &image_name, transform).await
}

/// Handle crop requests.
///
/// `GET /crop/{image_name}?left=&top=&right=&bottom=`, all required.
/// Responds with `cropped_<name>`.
pub async fn crop_handler(
    State(state): State<AppState>,
    Path(image_name): Path<String>,
    Query(query): Query<CropQueryParams>,
) -> Result<Response, TransformError> {
    let transform = Transform::Crop {
        left: query.left,
        top: query.top,
        right: query.right,
        bottom: query.bottom,
    };
    run_transform(&state, &image_name, transform).await
}

/// Handle filter requests.
///
/// `GET /filter/{image_name}?filter_type=<blur|sharpen>`. Responds with
/// `<filter_type>_<name>`, keeping the filter name as requested.
pub async fn filter_handler(
    State(state): State<AppState>,
    Path(image_name): Path<String>,
    Query(query): Query<FilterQueryParams>,
) -> Result<Response, TransformError> {
    let transform = Transform::Filter {
        filter_type: query.filter_type,
    };
    run_transform(&state, &image_name, transform).await
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn run_transform(
    state: &AppState,
    image_name: &str,
    transform: Transform,
) -> Result<Response, TransformError> {
    let image = state.service.transform(image_name, transform).await?;
    Ok(attachment_response(image))
}

/// Build a download response for a transformed image.
fn attachment_response(image: TransformedImage) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, image.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                content_disposition(&image.filename),
            ),
        ],
        image.data,
    )
        .into_response()
}

/// `Content-Disposition` value for an attachment.
///
/// Plain names are quoted as-is; names with characters outside the URL-safe
/// set use the RFC 5987 `filename*` form.
pub fn content_disposition(filename: &str) -> String {
    let encoded = urlencoding::encode(filename);
    if encoded == filename {
        format!("attachment; filename=\"{}\"", filename)
    } else {
        format!("attachment; filename*=utf-8''{}", encoded)
    }
}
