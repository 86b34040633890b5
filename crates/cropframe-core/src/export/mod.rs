//! Crop export.
//!
//! Cuts the committed rectangle out of the decoded source and encodes the
//! result as PNG. The rectangle is rounded to whole pixels and clamped inside
//! the raster, so any rectangle the editor produces exports without error.

mod crop;
mod png;

pub use crop::crop_image;
pub use png::{encode_png, ExportError};

use crate::decode::DecodedImage;
use crate::geometry::CropRect;

/// Crop `image` to `rect` and encode the region as PNG.
pub fn export_crop(image: &DecodedImage, rect: &CropRect) -> Result<Vec<u8>, ExportError> {
    let extent = image
        .extent()
        .map_err(|_| ExportError::InvalidDimensions {
            width: image.width,
            height: image.height,
        })?;

    let region = rect.to_pixel_rect(extent);
    log::debug!("exporting crop {:?} from {}x{}", region, image.width, image.height);

    let cropped = crop_image(image, region)?;
    encode_png(&cropped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(width: u32, height: u32) -> DecodedImage {
        DecodedImage::new(width, height, vec![128; (width * height * 3) as usize])
    }

    #[test]
    fn test_export_crop_produces_png_of_rect_size() {
        let image = gray(200, 100);
        let bytes = export_crop(&image, &CropRect::new(10.4, 20.6, 50.0, 30.0)).unwrap();

        let decoded = crate::decode::decode_image(&bytes).unwrap();
        assert_eq!((decoded.width, decoded.height), (50, 30));
    }

    #[test]
    fn test_export_crop_clamps_outside_rect() {
        let image = gray(100, 100);
        let bytes = export_crop(&image, &CropRect::new(80.0, 80.0, 200.0, 200.0)).unwrap();

        let decoded = crate::decode::decode_image(&bytes).unwrap();
        assert_eq!((decoded.width, decoded.height), (20, 20));
    }

    #[test]
    fn test_export_crop_empty_image() {
        let image = DecodedImage {
            width: 0,
            height: 0,
            pixels: Vec::new(),
        };
        let result = export_crop(&image, &CropRect::new(0.0, 0.0, 10.0, 10.0));
        assert!(matches!(result, Err(ExportError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_export_crop_short_buffer() {
        let image = DecodedImage {
            width: 10,
            height: 10,
            pixels: vec![0; 10],
        };
        let result = export_crop(&image, &CropRect::new(0.0, 0.0, 5.0, 5.0));
        assert_eq!(
            result,
            Err(ExportError::InvalidPixelData {
                expected: 300,
                actual: 10
            })
        );
    }
}
