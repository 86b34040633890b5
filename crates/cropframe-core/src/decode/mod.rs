//! Source image decoding.
//!
//! Turns uploaded file bytes into an RGB raster whose dimensions match what
//! the page displays. JPEG and PNG are recognised from their magic bytes; the
//! EXIF orientation tag is applied before the extent is taken, so the crop
//! rectangle and the exported pixels share one coordinate space.

mod raster;
mod types;

pub use raster::decode_image;
pub use types::{DecodeError, DecodedImage, Orientation};
