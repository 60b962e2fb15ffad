//! Flat-directory image store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::debug;

use crate::error::StoreError;

use super::filename::sanitize_filename;

/// A flat directory of image files keyed by sanitized filename.
///
/// The store holds no in-memory state besides its root path, so it is cheap to
/// clone and safe to share between concurrent requests. Writes to the same key
/// race at the filesystem level; the last writer wins.
///
/// # Example
///
/// ```ignore
/// use image_transformer::store::ImageStore;
///
/// let store = ImageStore::new("images");
/// store.ensure_exists().await?;
///
/// store.write("photo.jpg", &bytes).await?;
/// assert!(store.contains("photo.jpg").await?);
/// ```
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    /// Create a store rooted at `root`. The directory is not touched until
    /// [`ensure_exists`](Self::ensure_exists) or a write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the store directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the store directory (and parents) if it does not exist yet.
    pub async fn ensure_exists(&self) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Resolve the on-disk path for a name.
    ///
    /// The name is sanitized to its final path component first, so the
    /// returned path is always a direct child of the store root.
    pub fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        let key = sanitize_filename(name)
            .ok_or_else(|| StoreError::InvalidFilename(name.to_string()))?;
        Ok(self.root.join(key))
    }

    /// Check whether a regular file is stored under `name`.
    pub async fn contains(&self, name: &str) -> Result<bool, StoreError> {
        let path = self.path_for(name)?;
        match tokio::fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Write `data` under `name`, replacing any existing file.
    ///
    /// Returns the path that was written.
    pub async fn write(&self, name: &str, data: &[u8]) -> Result<PathBuf, StoreError> {
        let path = self.path_for(name)?;
        tokio::fs::write(&path, data).await?;
        debug!(path = %path.display(), bytes = data.len(), "Stored file");
        Ok(path)
    }

    /// Read the file stored under `name`.
    ///
    /// A missing file (or a name that sanitizes to nothing) is reported as
    /// [`StoreError::NotFound`].
    pub async fn read(&self, name: &str) -> Result<Bytes, StoreError> {
        let path = self
            .path_for(name)
            .map_err(|_| StoreError::NotFound(name.to_string()))?;

        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(name.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete the file stored under `name`. Removing a missing file is not an error.
    pub async fn remove(&self, name: &str) -> Result<(), StoreError> {
        let path = self.path_for(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(path = %path.display(), "Removed file");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
