//! Image transformations.
//!
//! ```text
//! ┌──────────────┐     ┌─────────────────────┐     ┌──────────────┐
//! │ codec::decode│ ──▶ │  Transform::apply   │ ──▶ │ codec::encode│
//! │ (sniffed fmt)│     │ rotate / grayscale  │     │ (by filename │
//! └──────────────┘     │ resize / crop /     │     │  extension)  │
//!                      │ filter              │     └──────────────┘
//!                      └─────────────────────┘
//! ```
//!
//! - [`Transform`]: one variant per supported operation, with its parameters
//! - [`Transform::output_name`]: deterministic derived filename
//! - [`codec`]: format detection, decode and encode helpers

pub mod codec;
mod ops;

pub use ops::{
    rotated_bounds, FilterKind, Transform, BLUR_SIGMA, DEFAULT_FILTER_TYPE,
    DEFAULT_ROTATION_DEGREES, MAX_OUTPUT_PIXELS,
};
