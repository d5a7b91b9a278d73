//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must
//! implement.

use async_trait::async_trait;
use thiserror::Error;
use tienda_core::StorageBackend;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// All storage backends (S3-compatible, local filesystem) must implement
/// this trait, so the media pipeline works with any backend without
/// coupling to implementation details.
///
/// **Key format:** namespace-scoped relative paths, `{namespace}/{filename}`.
/// See the crate root documentation.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload `data` under `key` with the given content type.
    ///
    /// Keys are unique per upload, so overwrite semantics are never relied
    /// upon. `content_type` is advisory; backends that derive the type
    /// from the key's extension may ignore it.
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> StorageResult<()>;

    /// Download an object by its storage key.
    async fn download(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Delete an object by its storage key.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Check whether an object exists.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

/// Reject keys that could escape the bucket namespace.
pub(crate) fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() || key.contains("..") || key.starts_with('/') {
        return Err(StorageError::InvalidKey(format!(
            "storage key contains invalid characters: {key}"
        )));
    }
    Ok(())
}
