//! Tienda Media Library
//!
//! Image ingestion for the back-office: transcode uploads to WebP, derive
//! a collision-resistant storage key, upload, and hand back the public
//! URL; reverse the mapping on delete.
//!
//! The pipeline owns the URL ↔ key mapping. Callers persist only the
//! public URL as a plain column value; the storage key is recovered by
//! stripping the configured public base. There is no referential
//! integrity between store and database beyond the caller's
//! delete-object-then-delete-row ordering.

pub mod error;
pub mod pipeline;
pub mod transcode;

// Re-export commonly used types
pub use error::MediaError;
pub use pipeline::{derive_key, ImagePipeline, Retirement};
pub use transcode::WebpTranscoder;
