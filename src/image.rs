//! Raster image helpers: JPEG re-encoding for vision uploads, decoding of
//! generated images, and saving results to disk.

use crate::{Error, Result};
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use std::path::Path;

/// JPEG quality used for images inlined into vision requests.
pub const UPLOAD_JPEG_QUALITY: u8 = 80;

fn encode_jpeg_sync(image_data: &[u8], quality: u8) -> Result<Vec<u8>> {
    let img = image::load_from_memory(image_data)?;
    // JPEG has no alpha channel.
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());

    let mut bytes = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, quality))?;
    Ok(bytes)
}

/// Decode any supported image format and re-encode it as JPEG.
pub async fn encode_jpeg(image_data: &[u8]) -> Result<Vec<u8>> {
    let image_data = image_data.to_vec();
    tokio::task::spawn_blocking(move || encode_jpeg_sync(&image_data, UPLOAD_JPEG_QUALITY))
        .await
        .map_err(|e| Error::Invariant(format!("Image encoding task join error: {}", e)))?
}

/// Decode response bytes as a raster image.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes)
        .map_err(|e| Error::Parse(format!("Response is not a decodable image: {}", e)))
}

/// Save an image, picking the format from the file extension.
pub fn save(image: &DynamicImage, path: &Path) -> Result<()> {
    image.save(path)?;
    tracing::info!("Saved image to {}", path.display());
    Ok(())
}
