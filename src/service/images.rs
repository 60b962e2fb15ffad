//! Upload and transform pipeline over the two image stores.

use bytes::Bytes;
use image::ImageFormat;
use tracing::{debug, info, warn};

use crate::error::{StoreError, TransformError, UploadError};
use crate::store::{sanitize_filename, ImageStore, MAX_NAME_LEN};
use crate::transform::{codec, Transform};

/// Content types accepted on upload. Compared exactly.
pub const SUPPORTED_CONTENT_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

// =============================================================================
// Upload Types
// =============================================================================

/// An image received from a client.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Filename as sent by the client, possibly with directory components
    pub filename: String,

    /// Client-declared MIME type
    pub content_type: Option<String>,

    /// Raw file bytes
    pub data: Bytes,
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    /// Filename as sent by the client
    pub filename: String,

    /// Key the file was stored under
    pub stored_name: String,
}

impl UploadReceipt {
    /// Message returned to the client.
    pub fn info(&self) -> String {
        format!("Image '{}' uploaded successfully", self.filename)
    }
}

// =============================================================================
// Transform Types
// =============================================================================

/// An encoded transform result, already persisted in the derived store.
#[derive(Debug, Clone)]
pub struct TransformedImage {
    /// Derived-store name, also used as the download filename
    pub filename: String,

    /// MIME type of the encoded data
    pub content_type: &'static str,

    /// Encoded image bytes
    pub data: Bytes,
}

// =============================================================================
// Image Service
// =============================================================================

/// Upload and transform handlers sharing a source and a derived store.
///
/// The service itself has no mutable state; all state lives in the two
/// directories. Decoding and encoding run on the blocking thread pool so that
/// a large image does not stall the async runtime.
///
/// # Example
///
/// ```ignore
/// use image_transformer::service::{ImageService, ImageUpload};
/// use image_transformer::store::ImageStore;
/// use image_transformer::transform::Transform;
///
/// let service = ImageService::new(ImageStore::new("images"), ImageStore::new("processed"));
/// service.ensure_stores().await?;
///
/// let receipt = service.upload(upload).await?;
/// let rotated = service
///     .transform(&receipt.stored_name, Transform::Rotate { degrees: 90 })
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct ImageService {
    /// Uploaded originals
    images: ImageStore,

    /// Transform outputs
    processed: ImageStore,
}

impl ImageService {
    /// Create a service over a source store and a derived store.
    pub fn new(images: ImageStore, processed: ImageStore) -> Self {
        Self { images, processed }
    }

    /// Get the source store.
    pub fn images(&self) -> &ImageStore {
        &self.images
    }

    /// Get the derived store.
    pub fn processed(&self) -> &ImageStore {
        &self.processed
    }

    /// Create both store directories if they are missing.
    pub async fn ensure_stores(&self) -> Result<(), StoreError> {
        self.images.ensure_exists().await?;
        self.processed.ensure_exists().await?;
        Ok(())
    }

    /// Validate and persist an uploaded image.
    ///
    /// 1. Rejects declared content types other than JPEG and PNG
    /// 2. Writes the bytes under the sanitized filename, replacing any existing file
    /// 3. Reads the stored file back and decodes it; on failure the file is
    ///    deleted again
    ///
    /// # Errors
    ///
    /// - [`UploadError::UnsupportedContentType`] if the declared type is not allowed
    /// - [`UploadError::InvalidImage`] if the stored bytes do not decode
    /// - [`UploadError::Store`] on filesystem failures or an unusable filename
    pub async fn upload(&self, upload: ImageUpload) -> Result<UploadReceipt, UploadError> {
        let declared = upload.content_type.as_deref().unwrap_or_default();
        if !SUPPORTED_CONTENT_TYPES.iter().any(|t| *t == declared) {
            return Err(UploadError::UnsupportedContentType {
                content_type: upload.content_type,
            });
        }

        let stored_name = sanitize_filename(&upload.filename)
            .ok_or_else(|| StoreError::InvalidFilename(upload.filename.clone()))?;

        self.images.write(&stored_name, &upload.data).await?;

        let stored = self.images.read(&stored_name).await?;
        let valid = tokio::task::spawn_blocking(move || codec::is_valid_image(&stored))
            .await
            .map_err(|e| UploadError::Internal(e.to_string()))?;

        if !valid {
            if let Err(e) = self.images.remove(&stored_name).await {
                warn!(name = %stored_name, "Failed to remove invalid upload: {}", e);
            }
            return Err(UploadError::InvalidImage);
        }

        info!(
            name = %stored_name,
            bytes = upload.data.len(),
            "Image uploaded"
        );

        Ok(UploadReceipt {
            filename: upload.filename,
            stored_name,
        })
    }

    /// Apply a transform to a stored image.
    ///
    /// Looks up the sanitized `image_name` in the source store, decodes it,
    /// applies `transform`, encodes the result according to the derived
    /// filename's extension, and writes it to the derived store (overwriting
    /// any earlier result with the same name).
    ///
    /// # Errors
    ///
    /// - [`TransformError::NotFound`] if no such source image exists
    /// - [`TransformError::UnsupportedFilter`] and other parameter errors
    /// - [`TransformError::NameTooLong`] if the derived name exceeds [`MAX_NAME_LEN`]
    /// - [`TransformError::Decode`] / [`TransformError::Encode`] on codec failures
    /// - [`TransformError::Store`] on filesystem failures
    pub async fn transform(
        &self,
        image_name: &str,
        transform: Transform,
    ) -> Result<TransformedImage, TransformError> {
        let name = sanitize_filename(image_name).ok_or_else(|| TransformError::NotFound {
            name: image_name.to_string(),
        })?;

        let source = match self.images.read(&name).await {
            Ok(data) => data,
            Err(StoreError::NotFound(_)) => return Err(TransformError::NotFound { name }),
            Err(e) => return Err(e.into()),
        };

        transform.validate()?;

        let filename = transform.output_name(&name);
        if filename.len() > MAX_NAME_LEN {
            return Err(TransformError::NameTooLong {
                len: filename.len(),
                name: filename,
            });
        }
        let kind = transform.kind();

        let (data, format) = {
            let filename = filename.clone();
            tokio::task::spawn_blocking(move || -> Result<(Bytes, ImageFormat), TransformError> {
                let (image, source_format) = codec::decode(&source)?;
                let result = transform.apply(&image)?;
                let format = codec::output_format(&filename, source_format);
                codec::encode(&result, format).map(|data| (data, format))
            })
            .await
            .map_err(|e| TransformError::Task(e.to_string()))??
        };

        self.processed.write(&filename, &data).await?;

        debug!(
            transform = kind,
            source = %name,
            output = %filename,
            bytes = data.len(),
            "Image transformed"
        );

        Ok(TransformedImage {
            filename,
            content_type: format.to_mime_type(),
            data,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
