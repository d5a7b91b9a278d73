//! Configuration module
//!
//! Environment-driven configuration for storage, image processing, and the
//! optional durable identifier store. `.env` files are honored in
//! development via dotenvy.

use std::env;
use std::str::FromStr;

use crate::constants::DEFAULT_WEBP_QUALITY;
use crate::storage_types::StorageBackend;

const MAX_FILE_SIZE_MB: usize = 10;
const DEFAULT_S3_REGION: &str = "auto"; // R2 convention

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: String,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (R2, MinIO, etc.)
    /// Public base URL objects are served from (CDN / r2.dev domain), not
    /// the API endpoint. Persisted URLs are `{public_url_base}/{key}`.
    pub public_url_base: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Image processing configuration
    pub webp_quality: f32,
    pub max_file_size_bytes: usize,
    // Durable identifier store (optional)
    pub database_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let storage_backend = env::var("STORAGE_BACKEND")
            .map(|s| StorageBackend::from_str(&s))
            .unwrap_or(Ok(StorageBackend::S3))?;

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| MAX_FILE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_FILE_SIZE_MB);

        let webp_quality = env::var("WEBP_QUALITY")
            .unwrap_or_else(|_| DEFAULT_WEBP_QUALITY.to_string())
            .parse::<f32>()
            .unwrap_or(DEFAULT_WEBP_QUALITY);

        let config = Config {
            environment,
            storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION")
                .or_else(|_| env::var("AWS_REGION"))
                .unwrap_or_else(|_| DEFAULT_S3_REGION.to_string()),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            public_url_base: env::var("PUBLIC_URL_BASE")
                .ok()
                .map(|s| s.trim_end_matches('/').to_string()),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL")
                .ok()
                .map(|s| s.trim_end_matches('/').to_string()),
            webp_quality,
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            database_url: env::var("DATABASE_URL").ok(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when STORAGE_BACKEND is s3"
                    ));
                }
                if self.public_url_base.is_none() {
                    return Err(anyhow::anyhow!(
                        "PUBLIC_URL_BASE must be set when STORAGE_BACKEND is s3"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() || self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH and LOCAL_STORAGE_BASE_URL must be set when STORAGE_BACKEND is local"
                    ));
                }
            }
        }

        if !(0.0..=100.0).contains(&self.webp_quality) {
            return Err(anyhow::anyhow!(
                "WEBP_QUALITY must be between 0 and 100, got {}",
                self.webp_quality
            ));
        }

        Ok(())
    }

    /// Public base URL for the active backend.
    pub fn effective_public_url_base(&self) -> Option<&str> {
        match self.storage_backend {
            StorageBackend::S3 => self.public_url_base.as_deref(),
            StorageBackend::Local => self.local_storage_base_url.as_deref(),
        }
    }
}
