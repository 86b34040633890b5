//! Image-space geometry.
//!
//! This module defines the source image extent, the crop rectangle, and the
//! small clamp helpers every rectangle mutation goes through. All values are
//! in image pixels with the origin at the top-left corner.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default minimum crop dimension in image pixels.
pub const MIN_SIZE: f64 = 50.0;

/// Tolerance used when checking rectangle invariants.
pub const EPSILON: f64 = 1e-9;

/// Error types for geometry construction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// The image has a zero dimension and cannot host a crop rectangle.
    #[error("Image extent must be non-zero, got {width}x{height}")]
    EmptyExtent { width: u32, height: u32 },
}

/// One of the two rectangle axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Pixel dimensions of the loaded source image.
///
/// Both dimensions are guaranteed non-zero. A new image replaces the extent
/// wholesale; it is never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageExtent {
    width: u32,
    height: u32,
}

impl ImageExtent {
    /// Create an extent, rejecting zero dimensions.
    pub fn new(width: u32, height: u32) -> Result<Self, GeometryError> {
        if width == 0 || height == 0 {
            return Err(GeometryError::EmptyExtent { width, height });
        }
        Ok(Self { width, height })
    }

    /// Image width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Length of the image along `axis`.
    #[inline]
    pub fn span(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width as f64,
            Axis::Vertical => self.height as f64,
        }
    }

    /// Smallest crop dimension allowed along `axis`.
    ///
    /// Images smaller than `min_size` allow their full dimension instead,
    /// so a valid rectangle always exists.
    #[inline]
    pub fn min_span(&self, axis: Axis, min_size: f64) -> f64 {
        min_size.min(self.span(axis))
    }
}

/// Crop rectangle in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (`x + width`)
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`)
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Width divided by height.
    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    /// Position of the low edge along `axis`.
    #[inline]
    pub fn pos(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Length along `axis`.
    #[inline]
    pub fn len(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Check every rectangle invariant against `extent`.
    pub fn is_within(&self, extent: ImageExtent, min_size: f64) -> bool {
        [Axis::Horizontal, Axis::Vertical].into_iter().all(|axis| {
            let pos = self.pos(axis);
            let len = self.len(axis);
            pos.is_finite()
                && len.is_finite()
                && pos >= -EPSILON
                && pos + len <= extent.span(axis) + EPSILON
                && len >= extent.min_span(axis, min_size) - EPSILON
        })
    }

    /// Values rounded to whole pixels, as shown in the numeric inputs.
    pub fn rounded(&self) -> CropRect {
        CropRect {
            x: self.x.round(),
            y: self.y.round(),
            width: self.width.round(),
            height: self.height.round(),
        }
    }

    /// Convert to an integer rectangle for export, clamped inside `extent`.
    ///
    /// The output is always at least 1x1 pixels.
    pub fn to_pixel_rect(&self, extent: ImageExtent) -> PixelRect {
        let left = round_into(self.x, extent.width - 1);
        let top = round_into(self.y, extent.height - 1);
        let right = round_into(self.right(), extent.width).max(left + 1);
        let bottom = round_into(self.bottom(), extent.height).max(top + 1);

        PixelRect {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        }
    }
}

/// Round a pixel coordinate and clamp it to `0..=max`.
fn round_into(value: f64, max: u32) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    (value.round() as u32).min(max)
}

/// Integer crop rectangle handed to the export pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Allowed range for one rectangle dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpanLimits {
    pub min: f64,
    pub max: f64,
}

impl SpanLimits {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        clamp_span(value, self.min, self.max)
    }
}

/// Clamp `value` into `[min, max]`.
///
/// Unlike `f64::clamp` this never panics: when `max < min` the upper bound
/// wins, since staying inside the image takes priority over the minimum size.
#[inline]
pub fn clamp_span(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Fit `width`/`height` to `ratio` (width / height) inside the given limits.
///
/// The `driver` axis keeps its value (clamped) and the other dimension is
/// derived from it. If the derived dimension has to be clamped, the driver is
/// recomputed from the clamped value. When both limits conflict the result is
/// clamped and may be off-ratio; the next mutation corrects it.
pub fn fit_ratio(
    driver: Axis,
    width: f64,
    height: f64,
    ratio: f64,
    width_limits: SpanLimits,
    height_limits: SpanLimits,
) -> (f64, f64) {
    match driver {
        Axis::Horizontal => {
            let width = width_limits.clamp(width);
            let height = height_limits.clamp(width / ratio);
            (width_limits.clamp(height * ratio), height)
        }
        Axis::Vertical => {
            let height = height_limits.clamp(height);
            let width = width_limits.clamp(height * ratio);
            (width, height_limits.clamp(width / ratio))
        }
    }
}
