//! Decode and export WASM bindings.
//!
//! `decode_image` turns the uploaded file into a raster whose size feeds
//! `CropEditor::load_image`; `export_crop` cuts the committed rectangle out of
//! it and returns PNG bytes.

use crate::types::{JsCropRect, JsDecodedImage};
use cropframe_core::{decode, export};
use wasm_bindgen::prelude::*;

/// Decode JPEG or PNG bytes, applying EXIF orientation.
///
/// # Errors
///
/// Returns an error if the format is not recognised or the data is corrupted.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsDecodedImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Crop `image` to `rect` and encode the region as PNG.
///
/// The rectangle is rounded to whole pixels and clamped inside the image.
///
/// # Example
///
/// ```typescript
/// const png = export_crop(image, editor.rect());
/// const url = URL.createObjectURL(new Blob([png], { type: 'image/png' }));
/// ```
#[wasm_bindgen]
pub fn export_crop(image: &JsDecodedImage, rect: &JsCropRect) -> Result<Vec<u8>, JsValue> {
    export::export_crop(image.decoded(), rect.inner())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
