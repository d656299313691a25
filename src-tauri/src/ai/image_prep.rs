//! Image decoding, downscaling and base64 encoding for multimodal prompts.
//!
//! Uploads are re-encoded as JPEG no larger than 1024px on the long edge
//! so every provider receives the same, reasonably sized payload.

use base64::{engine::general_purpose::STANDARD, Engine};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use tracing::info;

use super::provider::ImagePart;
use crate::error::TutorError;

/// Maximum dimension (width or height) for images sent to the model.
pub const MAX_IMAGE_DIMENSION: u32 = 1024;

/// Decode an uploaded image and turn it into an inline prompt part.
///
/// Accepts anything the `image` crate can sniff (PNG, JPEG, WebP, ...).
pub fn prepare_image(image_bytes: &[u8]) -> Result<ImagePart, TutorError> {
    let img = image::load_from_memory(image_bytes).map_err(|e| {
        TutorError::Image(format!(
            "Failed to load image: {}. Ensure it's a valid PNG or JPEG.",
            e
        ))
    })?;
    info!("Loaded image: {}x{}", img.width(), img.height());

    let resized = resize_if_needed(img, MAX_IMAGE_DIMENSION);
    let jpeg_bytes = encode_to_jpeg(&resized)?;
    info!(
        "Prepared {}x{} JPEG, {} bytes",
        resized.width(),
        resized.height(),
        jpeg_bytes.len()
    );

    Ok(ImagePart {
        media_type: "image/jpeg",
        data_base64: STANDARD.encode(&jpeg_bytes),
    })
}

/// Resize image if either dimension exceeds max, maintaining aspect ratio.
fn resize_if_needed(img: DynamicImage, max_dimension: u32) -> DynamicImage {
    let (width, height) = (img.width(), img.height());
    if width <= max_dimension && height <= max_dimension {
        return img;
    }

    let scale = max_dimension as f32 / width.max(height) as f32;
    let new_width = ((width as f32 * scale) as u32).max(1);
    let new_height = ((height as f32 * scale) as u32).max(1);

    img.resize(new_width, new_height, image::imageops::FilterType::Lanczos3)
}

/// JPEG has no alpha channel, so flatten to RGB first.
fn encode_to_jpeg(img: &DynamicImage) -> Result<Vec<u8>, TutorError> {
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut buffer = Cursor::new(Vec::new());
    rgb.write_to(&mut buffer, ImageFormat::Jpeg)
        .map_err(|e| TutorError::Image(format!("Failed to encode image to JPEG: {}", e)))?;
    Ok(buffer.into_inner())
}
