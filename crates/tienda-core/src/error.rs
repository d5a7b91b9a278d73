//! Error types module
//!
//! This module provides the unified `AppError` enum used throughout the
//! tienda crates: database, storage, image-processing, and identifier
//! errors all funnel into it at the application boundary.
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the
//! `sqlx` feature.

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Identifier namespace exhausted: {namespace}")]
    NamespaceExhausted { namespace: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code this error maps to at the API boundary.
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::InvalidInput(_) => 400,
            AppError::NotFound(_) => 404,
            AppError::Database(_)
            | AppError::Storage(_)
            | AppError::ImageProcessing(_)
            | AppError::NamespaceExhausted { .. }
            | AppError::Config(_)
            | AppError::Internal(_) => 500,
        }
    }

    /// Machine-readable error code for API responses and logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::ImageProcessing(_) => "IMAGE_PROCESSING_ERROR",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::NamespaceExhausted { .. } => "NAMESPACE_EXHAUSTED",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        match err {
            SqlxError::RowNotFound => AppError::NotFound("Record not found".to_string()),
            other => AppError::Database(other),
        }
    }
}
