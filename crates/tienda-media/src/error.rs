//! Media pipeline errors.

use thiserror::Error;
use tienda_core::AppError;
use tienda_storage::StorageError;

#[derive(Debug, Error)]
pub enum MediaError {
    /// Transcoding or upload failure. The caller must not persist a URL;
    /// no partial state is left behind.
    #[error("Image ingestion failed: {0}")]
    IngestionFailed(String),

    /// Store delete failure during retirement. Non-fatal by contract: the
    /// caller logs and continues so a row delete is never blocked by a
    /// storage hiccup.
    #[error("Image retirement failed: {0}")]
    RetirementFailed(#[source] StorageError),
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::IngestionFailed(msg) => AppError::ImageProcessing(msg),
            MediaError::RetirementFailed(source) => AppError::Storage(source.to_string()),
        }
    }
}
