use crate::traits::{validate_key, Storage, StorageError, StorageResult};
use async_trait::async_trait;
use std::path::PathBuf;
use tienda_core::StorageBackend;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation, used in development and tests.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for object storage (e.g., "/var/lib/tienda/media")
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    /// Convert a storage key to a filesystem path.
    ///
    /// `validate_key` already rejects `..` and absolute keys, so the join
    /// cannot escape the base directory.
    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.base_path.join(key))
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put(&self, key: &str, data: Vec<u8>, _content_type: &str) -> StorageResult<()> {
        let path = self.key_to_path(key)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::UploadFailed(e.to_string()))?;
        }

        let mut file = fs::File::create(&path)
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;
        file.write_all(&data)
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;
        file.flush()
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        tracing::info!(
            key = %key,
            size_bytes = data.len() as u64,
            path = %path.display(),
            "Local upload successful"
        );

        Ok(())
    }

    async fn download(&self, key: &str) -> StorageResult<Vec<u8>> {
        let path = self.key_to_path(key)?;

        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(StorageError::DownloadFailed(e.to_string())),
        }
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.key_to_path(key)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(key = %key, "Local delete successful");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => {
                tracing::error!(error = %e, key = %key, "Local delete failed");
                Err(StorageError::DeleteFailed(e.to_string()))
            }
        }
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(key)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
