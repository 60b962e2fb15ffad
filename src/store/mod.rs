//! On-disk image stores.
//!
//! The service keeps all of its state in two flat directories:
//!
//! ```text
//! images/      source store  - uploaded originals, keyed by sanitized filename
//! processed/   derived store - transform outputs, keyed by derived name
//! ```
//!
//! Every user-supplied name passes through [`sanitize_filename`] before it is
//! joined onto a store root, so no request can address a path outside the
//! store directory.

mod filename;
mod image_store;

pub use filename::{sanitize_filename, MAX_NAME_LEN};
pub use image_store::ImageStore;
