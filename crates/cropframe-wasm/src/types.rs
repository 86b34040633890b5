//! WASM-compatible wrapper types.
//!
//! These wrap the core value types and give JavaScript getters in place of
//! public fields.

use cropframe_core::{AspectPreset, CropRect, DecodedImage};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// A crop rectangle in source image pixels.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsCropRect {
    inner: CropRect,
}

#[wasm_bindgen]
impl JsCropRect {
    #[wasm_bindgen(constructor)]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> JsCropRect {
        Self {
            inner: CropRect::new(x, y, width, height),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn x(&self) -> f64 {
        self.inner.x
    }

    #[wasm_bindgen(getter)]
    pub fn y(&self) -> f64 {
        self.inner.y
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> f64 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> f64 {
        self.inner.height
    }

    /// Copy with every value rounded, for the numeric inputs.
    pub fn rounded(&self) -> JsCropRect {
        Self {
            inner: self.inner.rounded(),
        }
    }

    /// Serialize as `{ x, y, width, height }`
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Deserialize from `{ x, y, width, height }`
    pub fn from_json(value: JsValue) -> Result<JsCropRect, JsValue> {
        let inner: CropRect =
            serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self { inner })
    }
}

impl JsCropRect {
    pub(crate) fn inner(&self) -> &CropRect {
        &self.inner
    }
}

impl From<CropRect> for JsCropRect {
    fn from(inner: CropRect) -> Self {
        Self { inner }
    }
}

/// A decoded image wrapper for JavaScript.
///
/// The pixel data stays in WASM memory. `pixels()` copies it out as a
/// `Uint8Array`; pass the wrapper itself to `export_crop` to avoid the copy.
#[wasm_bindgen]
pub struct JsDecodedImage {
    inner: DecodedImage,
}

#[wasm_bindgen]
impl JsDecodedImage {
    /// Wrap RGB pixel data (3 bytes per pixel, row-major order).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsDecodedImage {
        Self {
            inner: DecodedImage {
                width,
                height,
                pixels,
            },
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.pixels.len()
    }

    /// Returns RGB pixel data as Uint8Array (copied).
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels.clone()
    }
}

impl JsDecodedImage {
    pub(crate) fn from_decoded(inner: DecodedImage) -> Self {
        Self { inner }
    }

    pub(crate) fn decoded(&self) -> &DecodedImage {
        &self.inner
    }
}

/// One option of the aspect ratio selector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct PresetEntry {
    /// Value understood by `CropEditor::set_aspect_ratio`
    pub value: String,
    pub label: &'static str,
}

impl From<&AspectPreset> for PresetEntry {
    fn from(preset: &AspectPreset) -> Self {
        Self {
            value: preset.ratio.to_string(),
            label: preset.label,
        }
    }
}
