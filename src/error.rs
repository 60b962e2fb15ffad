use thiserror::Error;

/// Errors raised by an on-disk image store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested name has no usable final path component
    #[error("invalid filename '{0}'")]
    InvalidFilename(String),

    /// No file is stored under this name
    #[error("not found: {0}")]
    NotFound(String),

    /// Underlying filesystem error
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Errors returned by the upload (ingress) path.
///
/// The `Display` output of each variant is the exact message placed in the
/// `error` field of the JSON payload.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Declared content type is not one of the supported image types
    #[error("Invalid image format. Only JPEG and PNG are supported.")]
    UnsupportedContentType { content_type: Option<String> },

    /// Stored bytes did not decode as an image
    #[error("Uploaded file is not a valid image")]
    InvalidImage,

    /// The multipart body carried no `image` field
    #[error("No image file provided")]
    MissingFile,

    /// The multipart body could not be read
    #[error("Failed to upload image: {0}")]
    Multipart(String),

    /// Writing or verifying the file failed
    #[error("Failed to upload image: {0}")]
    Store(#[from] StoreError),

    /// Background verification task failed
    #[error("Failed to upload image: {0}")]
    Internal(String),
}

/// Errors returned by the transform path.
#[derive(Debug, Error)]
pub enum TransformError {
    /// No source image is stored under the requested name
    #[error("Image not found")]
    NotFound { name: String },

    /// Filter name is neither blur nor sharpen
    #[error("Unsupported filter type: {0}")]
    UnsupportedFilter(String),

    /// Resize target has a zero dimension or too many pixels
    #[error(
        "Invalid dimensions: {width}x{height} (width and height must be positive, at most {max} pixels in total)",
        max = crate::transform::MAX_OUTPUT_PIXELS
    )]
    InvalidDimensions { width: u32, height: u32 },

    /// Derived filename would exceed the store's name length limit
    #[error(
        "Derived filename is too long ({len} bytes, at most {max} allowed)",
        max = crate::store::MAX_NAME_LEN
    )]
    NameTooLong { name: String, len: usize },

    /// Crop box does not overlap the image
    #[error("Crop box ({left}, {top}, {right}, {bottom}) does not overlap the image")]
    EmptyCrop {
        left: i64,
        top: i64,
        right: i64,
        bottom: i64,
    },

    /// Stored source could not be decoded
    #[error("Failed to decode image: {message}")]
    Decode { message: String },

    /// Result could not be encoded
    #[error("Failed to encode image: {message}")]
    Encode { message: String },

    /// Reading the source or writing the result failed
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Background processing task failed
    #[error("Transform task failed: {0}")]
    Task(String),
}

impl TransformError {
    /// Whether this is an expected, caller-caused outcome rather than a fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            TransformError::NotFound { .. }
                | TransformError::UnsupportedFilter(_)
                | TransformError::InvalidDimensions { .. }
                | TransformError::NameTooLong { .. }
                | TransformError::EmptyCrop { .. }
        )
    }
}
