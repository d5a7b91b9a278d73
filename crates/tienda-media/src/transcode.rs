//! WebP transcoding.
//!
//! Every ingested image is re-encoded to lossy WebP at a fixed quality
//! (50 by default), trading fidelity for bandwidth. Decoding accepts any
//! raster format the `image` crate can sniff (png, jpeg, gif, bmp, webp).

use bytes::Bytes;
use image::GenericImageView;
use std::io::Cursor;

use crate::error::MediaError;
use tienda_core::constants::DEFAULT_WEBP_QUALITY;

/// Fixed-quality WebP transcoder.
///
/// Output is deterministic for identical input bytes and quality.
#[derive(Clone, Copy, Debug)]
pub struct WebpTranscoder {
    quality: f32,
}

impl Default for WebpTranscoder {
    fn default() -> Self {
        Self {
            quality: DEFAULT_WEBP_QUALITY,
        }
    }
}

impl WebpTranscoder {
    pub fn new(quality: f32) -> Self {
        Self { quality }
    }

    pub fn quality(&self) -> f32 {
        self.quality
    }

    /// Decode `data` and re-encode it as lossy WebP.
    pub fn transcode(&self, data: &[u8]) -> Result<Bytes, MediaError> {
        if data.is_empty() {
            return Err(MediaError::IngestionFailed(
                "empty image buffer".to_string(),
            ));
        }

        let img = image::ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| MediaError::IngestionFailed(format!("unreadable image: {e}")))?
            .decode()
            .map_err(|e| MediaError::IngestionFailed(format!("undecodable image: {e}")))?;

        let (width, height) = img.dimensions();
        let rgba = img.to_rgba8();

        let encoder = webp::Encoder::from_rgba(&rgba, width, height);
        let webp_data = encoder.encode(self.quality);

        Ok(Bytes::copy_from_slice(&webp_data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn png_fixture() -> Vec<u8> {
        let img = RgbaImage::from_pixel(8, 8, Rgba([200, 40, 40, 255]));
        let mut buffer = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
            .unwrap();
        buffer
    }

    #[test]
    fn test_transcode_produces_webp() {
        let out = WebpTranscoder::default().transcode(&png_fixture()).unwrap();
        assert_eq!(&out[0..4], b"RIFF");
        assert_eq!(&out[8..12], b"WEBP");
    }

    #[test]
    fn test_transcode_is_deterministic() {
        let input = png_fixture();
        let transcoder = WebpTranscoder::default();
        let a = transcoder.transcode(&input).unwrap();
        let b = transcoder.transcode(&input).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(
            WebpTranscoder::default().transcode(&[]),
            Err(MediaError::IngestionFailed(_))
        ));
    }

    #[test]
    fn test_corrupt_input_rejected() {
        let garbage = vec![0xde, 0xad, 0xbe, 0xef, 0x00, 0x01, 0x02];
        assert!(matches!(
            WebpTranscoder::default().transcode(&garbage),
            Err(MediaError::IngestionFailed(_))
        ));
    }
}
