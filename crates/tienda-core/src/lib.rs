//! Tienda Core Library
//!
//! This crate provides configuration, error types, identifier generation,
//! and the small text utilities (slugs, random tokens) shared across all
//! tienda components.

pub mod config;
pub mod constants;
pub mod error;
pub mod idgen;
pub mod slug;
pub mod storage_types;
pub mod token;

// Re-export commonly used types
pub use config::Config;
pub use error::AppError;
pub use idgen::{CounterStore, InMemoryCounterStore, TextIdGenerator};
pub use storage_types::StorageBackend;
