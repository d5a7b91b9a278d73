//! Integration tests for the image ingestion pipeline against the local
//! storage backend and a recording mock store.

use std::io::Cursor;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use image::{Rgba, RgbaImage};
use tienda_core::StorageBackend;
use tienda_media::{ImagePipeline, MediaError, Retirement};
use tienda_storage::{LocalStorage, Storage, StorageError, StorageResult};

fn png_fixture() -> Vec<u8> {
    let img = RgbaImage::from_pixel(16, 16, Rgba([30, 90, 200, 255]));
    let mut buffer = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
        .unwrap();
    buffer
}

/// Mock store that records every call and can be told to fail deletes.
#[derive(Default)]
struct RecordingStorage {
    puts: Mutex<Vec<String>>,
    deletes: Mutex<Vec<String>>,
    fail_deletes: bool,
}

#[async_trait]
impl Storage for RecordingStorage {
    async fn put(&self, key: &str, _data: Vec<u8>, _content_type: &str) -> StorageResult<()> {
        self.puts.lock().unwrap().push(key.to_string());
        Ok(())
    }

    async fn download(&self, key: &str) -> StorageResult<Vec<u8>> {
        Err(StorageError::NotFound(key.to_string()))
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        if self.fail_deletes {
            return Err(StorageError::DeleteFailed("simulated outage".to_string()));
        }
        self.deletes.lock().unwrap().push(key.to_string());
        Ok(())
    }

    async fn exists(&self, _key: &str) -> StorageResult<bool> {
        Ok(false)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[tokio::test]
async fn test_ingest_roundtrip_on_local_backend() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(LocalStorage::new(dir.path()).await.unwrap());
    let pipeline = ImagePipeline::new(storage.clone(), "http://localhost:4000/media");

    let url = pipeline
        .ingest(png_fixture(), "Portada Principal.png", "banners")
        .await
        .unwrap();

    assert!(url.starts_with("http://localhost:4000/media/banners/"));

    let key = pipeline.key_for_url(&url).unwrap();
    let re = regex::Regex::new(r"^banners/[0-9a-f]{8}-portada-principal\.webp$").unwrap();
    assert!(re.is_match(key), "unexpected key: {key}");

    assert!(storage.exists(key).await.unwrap());
    let stored = storage.download(key).await.unwrap();
    assert_eq!(&stored[0..4], b"RIFF");
    assert_eq!(&stored[8..12], b"WEBP");
}

#[tokio::test]
async fn test_retire_issues_exactly_one_delete_with_stripped_key() {
    let storage = Arc::new(RecordingStorage::default());
    let pipeline = ImagePipeline::new(storage.clone(), "https://cdn.example.com");

    let outcome = pipeline
        .retire("https://cdn.example.com/productos/abcd1234-shoe.webp")
        .await
        .unwrap();

    assert_eq!(outcome, Retirement::Deleted);
    let deletes = storage.deletes.lock().unwrap();
    assert_eq!(&*deletes, &["productos/abcd1234-shoe.webp".to_string()]);
}

#[tokio::test]
async fn test_retire_foreign_url_is_a_noop() {
    let storage = Arc::new(RecordingStorage::default());
    let pipeline = ImagePipeline::new(storage.clone(), "https://cdn.example.com");

    let outcome = pipeline
        .retire("https://other.example.net/productos/abcd1234-shoe.webp")
        .await
        .unwrap();

    assert_eq!(outcome, Retirement::Foreign);
    assert!(storage.deletes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_retire_missing_object_counts_as_deleted() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(LocalStorage::new(dir.path()).await.unwrap());
    let pipeline = ImagePipeline::new(storage, "http://localhost:4000/media");

    let outcome = pipeline
        .retire("http://localhost:4000/media/banners/deadbeef-gone.webp")
        .await
        .unwrap();

    assert_eq!(outcome, Retirement::Deleted);
}

#[tokio::test]
async fn test_retire_store_failure_is_reported_not_swallowed() {
    let storage = Arc::new(RecordingStorage {
        fail_deletes: true,
        ..Default::default()
    });
    let pipeline = ImagePipeline::new(storage, "https://cdn.example.com");

    let result = pipeline
        .retire("https://cdn.example.com/banners/abcd1234-promo.webp")
        .await;

    assert!(matches!(result, Err(MediaError::RetirementFailed(_))));
}

#[tokio::test]
async fn test_ingest_corrupt_image_uploads_nothing() {
    let storage = Arc::new(RecordingStorage::default());
    let pipeline = ImagePipeline::new(storage.clone(), "https://cdn.example.com");

    let result = pipeline
        .ingest(vec![0xba, 0xad, 0xf0, 0x0d], "broken.png", "productos")
        .await;

    assert!(matches!(result, Err(MediaError::IngestionFailed(_))));
    assert!(storage.puts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_ingest_rejects_oversized_payload() {
    let storage = Arc::new(RecordingStorage::default());
    let pipeline =
        ImagePipeline::new(storage.clone(), "https://cdn.example.com").with_max_file_size(16);

    let result = pipeline
        .ingest(png_fixture(), "enorme.png", "productos")
        .await;

    assert!(matches!(result, Err(MediaError::IngestionFailed(_))));
    assert!(storage.puts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_pipeline_from_config() {
    use tienda_core::Config;

    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        environment: "test".to_string(),
        storage_backend: StorageBackend::Local,
        s3_bucket: None,
        s3_region: "auto".to_string(),
        s3_endpoint: None,
        public_url_base: None,
        local_storage_path: Some(dir.path().display().to_string()),
        local_storage_base_url: Some("http://localhost:4000/media".to_string()),
        webp_quality: 50.0,
        max_file_size_bytes: 1024 * 1024,
        database_url: None,
    };

    let storage = Arc::new(LocalStorage::new(dir.path()).await.unwrap());
    let pipeline = ImagePipeline::from_config(storage, &config).unwrap();
    assert_eq!(pipeline.public_base_url(), "http://localhost:4000/media");

    let url = pipeline
        .ingest(png_fixture(), "foto.png", "categorias")
        .await
        .unwrap();
    assert!(url.starts_with("http://localhost:4000/media/categorias/"));
}

#[tokio::test]
async fn test_ingest_rejects_bad_namespace() {
    let storage = Arc::new(RecordingStorage::default());
    let pipeline = ImagePipeline::new(storage, "https://cdn.example.com");

    for namespace in ["", "a/b", ".."] {
        let result = pipeline
            .ingest(png_fixture(), "foto.png", namespace)
            .await;
        assert!(
            matches!(result, Err(MediaError::IngestionFailed(_))),
            "namespace {namespace:?} should be rejected"
        );
    }
}
