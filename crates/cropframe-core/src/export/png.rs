//! PNG encoding for export.

use std::io::Cursor;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use thiserror::Error;

use crate::decode::DecodedImage;

/// Errors that can occur while exporting a crop.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// PNG encoding failed
    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),
}

/// Encode an RGB image as PNG bytes.
pub fn encode_png(image: &DecodedImage) -> Result<Vec<u8>, ExportError> {
    validate(image)?;

    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new(&mut buffer)
        .write_image(
            &image.pixels,
            image.width,
            image.height,
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| ExportError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Check that `image` has non-zero dimensions and a matching RGB buffer.
pub(crate) fn validate(image: &DecodedImage) -> Result<(), ExportError> {
    if image.width == 0 || image.height == 0 {
        return Err(ExportError::InvalidDimensions {
            width: image.width,
            height: image.height,
        });
    }

    let expected = image.expected_len();
    if image.pixels.len() != expected {
        return Err(ExportError::InvalidPixelData {
            expected,
            actual: image.pixels.len(),
        });
    }
    Ok(())
}
