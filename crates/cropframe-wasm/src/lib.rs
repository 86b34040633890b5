//! Cropframe WASM - WebAssembly bindings for the crop editor
//!
//! This crate exposes the cropframe-core geometry engine to the JavaScript
//! tool page. The page renders the image and the rectangle; everything that
//! decides where the rectangle goes runs here.
//!
//! # Module Structure
//!
//! - `editor` - The `CropEditor` handle the page holds for one crop session
//! - `listeners` - Document-level pointer listeners scoped to a drag
//! - `export` - Decode and PNG export bindings
//! - `types` - WASM-compatible wrapper types
//! - `logging` - `log` backend writing to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { CropEditor, decode_image, export_crop } from '@cropframe/wasm';
//!
//! await init();
//!
//! const image = decode_image(new Uint8Array(await file.arrayBuffer()));
//! const editor = new CropEditor();
//! editor.set_on_change((rect) => render(rect.rounded()));
//! render(editor.load_image(image.width, image.height));
//!
//! handle.addEventListener('pointerdown', (e) => editor.begin_drag('se', e, img));
//!
//! const png = export_crop(image, editor.rect());
//! ```

use cropframe_core::PRESETS;
use wasm_bindgen::prelude::*;

mod editor;
mod export;
mod listeners;
mod logging;
mod types;

pub use editor::CropEditor;
pub use export::{decode_image, export_crop};
pub use types::{JsCropRect, JsDecodedImage};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logging::init(log::LevelFilter::Warn);
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Change the console log level (`"off"`, `"error"`, ..., `"trace"`).
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let filter = logging::parse_level(level).map_err(|e| JsValue::from_str(&e))?;
    log::set_max_level(filter);
    Ok(())
}

/// Entries for the aspect ratio selector as `[{ value, label }]`.
#[wasm_bindgen]
pub fn aspect_ratio_presets() -> Result<JsValue, JsValue> {
    let entries: Vec<types::PresetEntry> = PRESETS.iter().map(types::PresetEntry::from).collect();
    serde_wasm_bindgen::to_value(&entries).map_err(|e| JsValue::from_str(&e.to_string()))
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_set_log_level() {
        assert!(set_log_level("debug").is_ok());
        assert_eq!(log::max_level(), log::LevelFilter::Debug);
        assert!(set_log_level("loud").is_err());
        assert!(set_log_level("warn").is_ok());
    }

    #[wasm_bindgen_test]
    fn test_init_twice() {
        init();
        init();
        assert!(set_log_level("warn").is_ok());
        assert_eq!(log::max_level(), log::LevelFilter::Warn);
    }

    #[wasm_bindgen_test]
    fn test_aspect_ratio_presets() {
        let value = aspect_ratio_presets().unwrap();
        let array = js_sys::Array::from(&value);
        assert_eq!(array.length(), PRESETS.len() as u32);
    }
}
