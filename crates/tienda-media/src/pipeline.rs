//! Image ingestion pipeline: transcode → key → upload → public URL, and
//! the reverse mapping on delete.

use std::sync::Arc;

use tienda_core::slug::file_stem_slug;
use tienda_core::token::short_token;
use tienda_core::{AppError, Config};
use tienda_storage::{Storage, StorageError};

use crate::error::MediaError;
use crate::transcode::WebpTranscoder;

/// Outcome of a retirement attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retirement {
    /// The object was deleted, or was already absent from the store.
    Deleted,
    /// The URL does not belong to the configured public base; nothing was
    /// deleted. Treated as success so a foreign or malformed URL never
    /// blocks the caller's row delete.
    Foreign,
}

/// Derive a storage key for an upload:
/// `{namespace}/{token}-{slug}.webp`.
///
/// The 8-hex random token makes the key unique per call; the slugified
/// original filename keeps keys human-readable. The extension is forced
/// to `.webp` because every upload is transcoded.
pub fn derive_key(namespace: &str, original_filename: &str) -> String {
    format!(
        "{}/{}-{}.webp",
        namespace,
        short_token(),
        file_stem_slug(original_filename)
    )
}

/// Image ingestion pipeline over an object store.
pub struct ImagePipeline {
    storage: Arc<dyn Storage>,
    transcoder: WebpTranscoder,
    public_base_url: String,
    max_bytes: Option<usize>,
}

impl ImagePipeline {
    pub fn new(storage: Arc<dyn Storage>, public_base_url: impl Into<String>) -> Self {
        Self {
            storage,
            transcoder: WebpTranscoder::default(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            max_bytes: None,
        }
    }

    /// Pipeline wired from configuration: public base, WebP quality, and
    /// the upload size limit.
    pub fn from_config(storage: Arc<dyn Storage>, config: &Config) -> Result<Self, AppError> {
        let base = config.effective_public_url_base().ok_or_else(|| {
            AppError::Config("public base URL not configured for storage backend".to_string())
        })?;
        Ok(Self::new(storage, base)
            .with_quality(config.webp_quality)
            .with_max_file_size(config.max_file_size_bytes))
    }

    pub fn with_quality(mut self, quality: f32) -> Self {
        self.transcoder = WebpTranscoder::new(quality);
        self
    }

    /// Reject uploads larger than `max_bytes` before decoding.
    pub fn with_max_file_size(mut self, max_bytes: usize) -> Self {
        self.max_bytes = Some(max_bytes);
        self
    }

    pub fn public_base_url(&self) -> &str {
        &self.public_base_url
    }

    /// Transcode `data` to WebP, upload it under a fresh key in
    /// `namespace`, and return the public URL.
    ///
    /// Transcoding and upload failures both surface as
    /// [`MediaError::IngestionFailed`]; the caller must not persist a URL
    /// on error. No partial state is left: the store object only exists
    /// once this returns `Ok`.
    pub async fn ingest(
        &self,
        data: Vec<u8>,
        original_filename: &str,
        namespace: &str,
    ) -> Result<String, MediaError> {
        if data.is_empty() {
            return Err(MediaError::IngestionFailed(
                "empty image buffer".to_string(),
            ));
        }
        if let Some(max) = self.max_bytes {
            if data.len() > max {
                return Err(MediaError::IngestionFailed(format!(
                    "image of {} bytes exceeds limit of {} bytes",
                    data.len(),
                    max
                )));
            }
        }
        if namespace.is_empty() || namespace.contains('/') || namespace.contains("..") {
            return Err(MediaError::IngestionFailed(format!(
                "invalid namespace: {namespace:?}"
            )));
        }

        let key = derive_key(namespace, original_filename);

        // Transcoding is CPU-bound; run it off the async pool.
        let transcoder = self.transcoder;
        let encoded = tokio::task::spawn_blocking(move || transcoder.transcode(&data))
            .await
            .map_err(|e| MediaError::IngestionFailed(format!("transcode task failed: {e}")))??;

        let size = encoded.len();
        self.storage
            .put(&key, encoded.to_vec(), "image/webp")
            .await
            .map_err(|e| MediaError::IngestionFailed(e.to_string()))?;

        let url = format!("{}/{}", self.public_base_url, key);

        tracing::info!(
            namespace = %namespace,
            key = %key,
            size_bytes = size as u64,
            "image ingested"
        );

        Ok(url)
    }

    /// Recover the storage key from a previously returned public URL.
    ///
    /// Returns `None` for URLs outside the configured public base.
    pub fn key_for_url<'a>(&self, public_url: &'a str) -> Option<&'a str> {
        public_url
            .strip_prefix(self.public_base_url.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|key| !key.is_empty())
    }

    /// Best-effort delete of the object behind `public_url`.
    ///
    /// Foreign URLs are skipped ([`Retirement::Foreign`]) and an already
    /// missing object counts as deleted, so retirement is idempotent.
    /// Live store failures are logged here and returned as
    /// [`MediaError::RetirementFailed`]; the caller decides to
    /// log-and-continue rather than fail its row delete.
    pub async fn retire(&self, public_url: &str) -> Result<Retirement, MediaError> {
        let Some(key) = self.key_for_url(public_url) else {
            tracing::warn!(
                url = %public_url,
                base = %self.public_base_url,
                "url outside public base, skipping store delete"
            );
            return Ok(Retirement::Foreign);
        };

        match self.storage.delete(key).await {
            Ok(()) => {
                tracing::info!(key = %key, "image retired");
                Ok(Retirement::Deleted)
            }
            Err(StorageError::NotFound(_)) => {
                tracing::info!(key = %key, "image already absent on retire");
                Ok(Retirement::Deleted)
            }
            Err(e) => {
                tracing::error!(error = %e, key = %key, "image retirement failed");
                Err(MediaError::RetirementFailed(e))
            }
        }
    }
}
