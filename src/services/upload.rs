//! Image upload processing.
//!
//! Uploaded images are scaled down to the configured width, re-encoded as
//! JPEG and handed back as a data URL that callers store on the record
//! (equipment photo, identity card scan, logo).

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{codecs::jpeg::JpegEncoder, imageops::FilterType, DynamicImage};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    config::UploadConfig,
    error::{AppError, AppResult},
};

/// Content types accepted from multipart uploads
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

const OUTPUT_TYPE: &str = "image/jpeg";

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UploadedImage {
    /// `data:image/jpeg;base64,...`
    pub url: String,
    pub filename: String,
    /// Size of the encoded image in bytes
    pub size: usize,
    #[serde(rename = "type")]
    pub content_type: String,
}

#[derive(Clone)]
pub struct UploadService {
    config: UploadConfig,
}

impl UploadService {
    pub fn new(config: UploadConfig) -> Self {
        Self { config }
    }

    pub fn max_bytes(&self) -> usize {
        self.config.max_bytes
    }

    /// Compress an uploaded image into a data URL
    pub async fn process_image(
        &self,
        filename: String,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> AppResult<UploadedImage> {
        if bytes.is_empty() {
            return Err(AppError::BadRequest("No file uploaded".to_string()));
        }
        if bytes.len() > self.config.max_bytes {
            return Err(AppError::BadRequest(format!(
                "File too large ({} bytes, limit {})",
                bytes.len(),
                self.config.max_bytes
            )));
        }
        if let Some(mime) = content_type {
            if !ALLOWED_IMAGE_TYPES.contains(&mime) {
                return Err(AppError::BadRequest(format!(
                    "Unsupported file type: {}",
                    mime
                )));
            }
        }

        let max_width = self.config.max_width;
        let quality = self.config.quality;
        let encoded = tokio::task::spawn_blocking(move || compress(&bytes, max_width, quality))
            .await
            .map_err(|e| AppError::Internal(format!("Image task failed: {}", e)))??;

        tracing::info!("Processed upload {} ({} bytes)", filename, encoded.len());
        Ok(UploadedImage {
            url: format!("data:{};base64,{}", OUTPUT_TYPE, STANDARD.encode(&encoded)),
            filename,
            size: encoded.len(),
            content_type: OUTPUT_TYPE.to_string(),
        })
    }
}

/// Decode, shrink to at most `max_width` pixels wide and re-encode as JPEG
fn compress(bytes: &[u8], max_width: u32, quality: u8) -> AppResult<Vec<u8>> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| AppError::BadRequest(format!("Unreadable image: {}", e)))?;

    let image = if image.width() > max_width {
        let height = (u64::from(image.height()) * u64::from(max_width) / u64::from(image.width()))
            .max(1) as u32;
        image.resize_exact(max_width, height, FilterType::Lanczos3)
    } else {
        image
    };

    let mut out = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100));
    DynamicImage::ImageRgb8(image.to_rgb8())
        .write_with_encoder(encoder)
        .map_err(|e| AppError::Internal(format!("Image encoding failed: {}", e)))?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([40, 120, 60])))
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    fn decode(url: &str) -> DynamicImage {
        let payload = url.strip_prefix("data:image/jpeg;base64,").unwrap();
        image::load_from_memory(&STANDARD.decode(payload).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn wide_images_are_scaled_to_max_width() {
        let service = UploadService::new(UploadConfig::default());
        let uploaded = service
            .process_image("tent.png".to_string(), Some("image/png"), png(1600, 900))
            .await
            .unwrap();

        assert_eq!(uploaded.content_type, "image/jpeg");
        assert_eq!(uploaded.filename, "tent.png");
        let image = decode(&uploaded.url);
        assert_eq!((image.width(), image.height()), (800, 450));
        assert_eq!(uploaded.size, STANDARD.decode(&uploaded.url[23..]).unwrap().len());
    }

    #[tokio::test]
    async fn small_images_keep_their_size() {
        let service = UploadService::new(UploadConfig::default());
        let uploaded = service
            .process_image("ktp.png".to_string(), None, png(320, 200))
            .await
            .unwrap();
        let image = decode(&uploaded.url);
        assert_eq!((image.width(), image.height()), (320, 200));
    }

    #[tokio::test]
    async fn rejects_garbage_and_empty_uploads() {
        let service = UploadService::new(UploadConfig::default());
        let err = service
            .process_image("x.jpg".to_string(), Some("image/jpeg"), b"not an image".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = service
            .process_image("x.jpg".to_string(), None, Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = service
            .process_image("x.pdf".to_string(), Some("application/pdf"), png(10, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
