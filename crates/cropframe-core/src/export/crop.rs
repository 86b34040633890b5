//! Pixel-space cropping.

use super::png::validate;
use super::ExportError;
use crate::decode::DecodedImage;
use crate::geometry::PixelRect;

/// Copy `region` out of `image`.
///
/// The region is clamped to the image bounds and the output is never smaller
/// than 1x1. A region covering the whole image returns a copy.
///
/// # Errors
///
/// Fails if the image is empty or its buffer does not hold
/// `width * height * 3` bytes.
pub fn crop_image(image: &DecodedImage, region: PixelRect) -> Result<DecodedImage, ExportError> {
    validate(image)?;

    if region.x == 0
        && region.y == 0
        && region.width >= image.width
        && region.height >= image.height
    {
        return Ok(image.clone());
    }

    let left = region.x.min(image.width.saturating_sub(1));
    let top = region.y.min(image.height.saturating_sub(1));
    let right = left.saturating_add(region.width).min(image.width);
    let bottom = top.saturating_add(region.height).min(image.height);

    let out_width = right.saturating_sub(left).max(1);
    let out_height = bottom.saturating_sub(top).max(1);

    let src_stride = image.width as usize * 3;
    let row_len = out_width as usize * 3;
    let mut output = Vec::with_capacity(row_len * out_height as usize);

    for y in top..top + out_height {
        let start = y as usize * src_stride + left as usize * 3;
        output.extend_from_slice(&image.pixels[start..start + row_len]);
    }

    Ok(DecodedImage::new(out_width, out_height, output))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Each pixel holds its own index, so copies can be traced back.
    fn test_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((y * width + x) % 256) as u8;
                pixels.extend_from_slice(&[v, v, v]);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    fn region(x: u32, y: u32, width: u32, height: u32) -> PixelRect {
        PixelRect {
            x,
            y,
            width,
            height,
        }
    }

    #[test]
    fn test_full_region_is_copy() {
        let image = test_image(10, 10);
        let cropped = crop_image(&image, region(0, 0, 10, 10)).unwrap();
        assert_eq!(cropped, image);
    }

    #[test]
    fn test_crop_center() {
        let image = test_image(10, 10);
        let cropped = crop_image(&image, region(2, 3, 4, 5)).unwrap();

        assert_eq!((cropped.width, cropped.height), (4, 5));
        assert_eq!(cropped.pixels.len(), 4 * 5 * 3);
        // First pixel is (2, 3) of the source
        assert_eq!(cropped.pixels[0], 32);
        // Last pixel is (5, 7)
        assert_eq!(cropped.pixels[cropped.pixels.len() - 1], 75);
    }

    #[test]
    fn test_crop_clamps_to_bounds() {
        let image = test_image(10, 10);
        let cropped = crop_image(&image, region(8, 8, 50, 50)).unwrap();
        assert_eq!((cropped.width, cropped.height), (2, 2));
        assert_eq!(cropped.pixels[0], 88);
    }

    #[test]
    fn test_crop_origin_outside_image() {
        let image = test_image(10, 10);
        let cropped = crop_image(&image, region(40, 40, 5, 5)).unwrap();
        assert_eq!((cropped.width, cropped.height), (1, 1));
        assert_eq!(cropped.pixels, vec![99, 99, 99]);
    }

    #[test]
    fn test_crop_rejects_short_buffer() {
        let image = DecodedImage {
            width: 10,
            height: 10,
            pixels: vec![0; 30],
        };
        assert_eq!(
            crop_image(&image, region(2, 2, 4, 4)),
            Err(ExportError::InvalidPixelData {
                expected: 300,
                actual: 30
            })
        );
    }

    #[test]
    fn test_crop_rejects_empty_image() {
        let image = DecodedImage {
            width: 0,
            height: 4,
            pixels: Vec::new(),
        };
        assert!(matches!(
            crop_image(&image, region(0, 0, 1, 1)),
            Err(ExportError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_crop_zero_size_gives_one_pixel() {
        let image = test_image(10, 10);
        let cropped = crop_image(&image, region(3, 4, 0, 0)).unwrap();
        assert_eq!((cropped.width, cropped.height), (1, 1));
        assert_eq!(cropped.pixels, vec![43, 43, 43]);
    }
}
