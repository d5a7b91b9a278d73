//! Tienda Storage Library
//!
//! Object-store abstraction and backends for tienda. The media pipeline
//! talks to the [`Storage`] trait; implementations cover S3-compatible
//! providers (Cloudflare R2, MinIO, AWS) and the local filesystem.
//!
//! # Storage key format
//!
//! Keys are namespace-scoped relative paths: `{namespace}/{filename}`,
//! e.g. `productos/ab12cd34-zapato.webp`. Keys must not contain `..` or a
//! leading `/`.

pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use tienda_core::StorageBackend;
pub use traits::{Storage, StorageError, StorageResult};
