//! Cropframe Core - crop rectangle geometry engine
//!
//! This crate provides the geometry behind the browser image cropper: the
//! rectangle state manager that keeps a crop rectangle valid against the
//! source image, the pointer-drag controller that feeds it, and the decode
//! and export collaborators on either side of it.
//!
//! # Module Structure
//!
//! - `geometry` - Extents, rectangles, and the clamp/ratio helpers
//! - `aspect` - Aspect ratio constraint and selector presets
//! - `handle` - The nine drag handles and their anchor rules
//! - `editor` - Rectangle state manager (`CropState`)
//! - `interaction` - Pointer drag state machine (`DragController`)
//! - `config` - Tunable editor defaults
//! - `decode` - Source image decoding
//! - `export` - Cropping and PNG export
//!
//! # Coordinate System
//!
//! - All rectangle values are in source image pixels
//! - Origin is the top-left corner
//! - Pointer positions are in screen pixels and converted through a
//!   [`ScaleMapping`] before they touch the rectangle

pub mod aspect;
pub mod config;
pub mod decode;
pub mod editor;
pub mod export;
pub mod geometry;
pub mod handle;
pub mod interaction;

pub use aspect::{AspectPreset, AspectRatio, PRESETS};
pub use config::{ConfigError, CropConfig};
pub use decode::{decode_image, DecodeError, DecodedImage};
pub use editor::{CropState, Field};
pub use export::{export_crop, ExportError};
pub use geometry::{CropRect, GeometryError, ImageExtent, PixelRect, MIN_SIZE};
pub use handle::Handle;
pub use interaction::{DragController, PointerPosition, ScaleMapping};

use thiserror::Error;

/// Errors raised when parsing labels coming from the page (handle names,
/// field names, aspect ratio selector values).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Handle label is not one of `move`, `n`, `s`, `e`, `w`, `ne`, `nw`, `se`, `sw`.
    #[error("Unknown handle: {0}")]
    UnknownHandle(String),

    /// Field label is not one of `x`, `y`, `width`, `height`.
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Aspect ratio is neither `free` nor a positive finite number.
    #[error("Invalid aspect ratio: {0}")]
    InvalidAspectRatio(String),
}
