//! Image service layer.
//!
//! The service sits between the HTTP handlers and the on-disk stores:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              HTTP Handlers              │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │              ImageService               │
//! │   upload()              transform()     │
//! └─────────┬───────────────────────┬───────┘
//!           │                       │
//!           ▼                       ▼
//! ┌──────────────────┐    ┌──────────────────┐
//! │  source store    │    │  derived store   │
//! │  (images/)       │    │  (processed/)    │
//! └──────────────────┘    └──────────────────┘
//! ```

mod images;

pub use images::{
    ImageService, ImageUpload, TransformedImage, UploadReceipt, SUPPORTED_CONTENT_TYPES,
};
