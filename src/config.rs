//! Configuration management for the image transformer.
//!
//! Settings come from command-line arguments via clap, with environment
//! variables (`IMG_` prefix) as fallback and sensible defaults otherwise.
//!
//! # Example
//!
//! ```ignore
//! use clap::Parser;
//! use image_transformer::config::Config;
//!
//! let config = Config::parse();
//! println!("Listening on {}", config.bind_address());
//! println!("Uploads stored in {}", config.images_dir.display());
//! ```
//!
//! # Environment Variables
//!
//! - `IMG_HOST` - Server bind address (default: 0.0.0.0)
//! - `IMG_PORT` - Server port (default: 8000)
//! - `IMG_IMAGES_DIR` - Source store directory (default: images)
//! - `IMG_PROCESSED_DIR` - Derived store directory (default: processed)
//! - `IMG_MAX_UPLOAD_SIZE` - Maximum upload body size in bytes (default: 20 MiB)
//! - `IMG_CORS_ORIGINS` - Comma-separated allowed CORS origins

use std::path::PathBuf;

use clap::Parser;

use crate::server::DEFAULT_MAX_UPLOAD_SIZE;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 8000;

/// Default source store directory.
pub const DEFAULT_IMAGES_DIR: &str = "images";

/// Default derived store directory.
pub const DEFAULT_PROCESSED_DIR: &str = "processed";

// =============================================================================
// CLI Arguments
// =============================================================================

/// Image Transformer - upload images and download transformed variants.
///
/// Uploaded images are kept in one directory; every rotate, grayscale,
/// resize, crop or filter request writes its result to a second directory
/// and returns it as a download.
#[derive(Parser, Debug, Clone)]
#[command(name = "image-transformer")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "IMG_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "IMG_PORT")]
    pub port: u16,

    // =========================================================================
    // Storage Configuration
    // =========================================================================
    /// Directory holding uploaded images. Created at startup if missing.
    #[arg(long, default_value = DEFAULT_IMAGES_DIR, env = "IMG_IMAGES_DIR")]
    pub images_dir: PathBuf,

    /// Directory holding transform outputs. Created at startup if missing.
    #[arg(long, default_value = DEFAULT_PROCESSED_DIR, env = "IMG_PROCESSED_DIR")]
    pub processed_dir: PathBuf,

    /// Maximum upload request body size in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_SIZE, env = "IMG_MAX_UPLOAD_SIZE")]
    pub max_upload_size: usize,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "IMG_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.images_dir.as_os_str().is_empty() {
            return Err(
                "images_dir must not be empty. Set --images-dir or IMG_IMAGES_DIR".to_string(),
            );
        }
        if self.processed_dir.as_os_str().is_empty() {
            return Err(
                "processed_dir must not be empty. Set --processed-dir or IMG_PROCESSED_DIR"
                    .to_string(),
            );
        }

        // Derived names could otherwise shadow uploads
        if self.images_dir == self.processed_dir {
            return Err("images_dir and processed_dir must be different directories".to_string());
        }

        if self.max_upload_size == 0 {
            return Err("max_upload_size must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// Tests
// =============================================================================
