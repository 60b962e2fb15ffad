//! # Image Transformer
//!
//! A small HTTP service that stores uploaded images and serves transformed
//! copies of them.
//!
//! Clients upload JPEG or PNG files, then request single-shot transformations
//! by filename. Each result is written to a second directory under a name
//! derived from the transform and its parameters, and returned as a download.
//!
//! ## Features
//!
//! - **Checked uploads**: declared content type gate plus a full decode of the
//!   stored bytes; undecodable files are removed
//! - **Transforms**: rotate (expanding canvas), grayscale, resize, crop, blur
//!   and sharpen
//! - **Deterministic outputs**: the same request always writes the same file
//! - **Path safety**: every user-supplied name is reduced to its final path
//!   component before touching the filesystem
//!
//! ## Architecture
//!
//! - [`store`] - Flat-directory image stores and filename sanitization
//! - [`transform`] - Transform definitions, decode and encode
//! - [`service`] - Upload and transform pipeline over the stores
//! - [`server`] - Axum-based HTTP handlers and router
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use image_transformer::{create_router, ImageService, ImageStore, RouterConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = ImageService::new(ImageStore::new("images"), ImageStore::new("processed"));
//!     service.ensure_stores().await?;
//!
//!     let router = create_router(service, RouterConfig::default());
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//!     axum::serve(listener, router).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod server;
pub mod service;
pub mod store;
pub mod transform;

// Re-export commonly used types
pub use config::Config;
pub use error::{StoreError, TransformError, UploadError};
pub use server::{create_router, AppState, ErrorResponse, InfoResponse, RouterConfig};
pub use service::{ImageService, ImageUpload, TransformedImage, UploadReceipt};
pub use store::{sanitize_filename, ImageStore};
pub use transform::{FilterKind, Transform};
