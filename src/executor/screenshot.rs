//! Screenshot normalization and encoding

use crate::capture::resolution::Resolution;
use crate::error::{Error, Result};
use base64::Engine;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;

/// Resize to the virtual resolution when needed and encode as base64 PNG
pub fn encode_screenshot(image: RgbaImage, target: Resolution) -> Result<String> {
    let image = if image.dimensions() != (target.width, target.height) {
        tracing::debug!(
            "Resizing screenshot {}x{} -> {}",
            image.width(),
            image.height(),
            target
        );
        image::imageops::resize(&image, target.width, target.height, FilterType::Lanczos3)
    } else {
        image
    };

    let mut bytes: Vec<u8> = Vec::new();
    DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| Error::CaptureFailure(format!("Failed to encode PNG: {}", e)))?;

    Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
}
