//! Rectangle state manager.
//!
//! [`CropState`] owns the crop rectangle for one loaded image together with
//! the active aspect ratio. Every operation is total: malformed or extreme
//! input is clamped, and the returned rectangle always satisfies
//!
//! - `0 <= x` and `0 <= y`
//! - `x + width <= extent.width` and `y + height <= extent.height`
//! - `width >= min_size` and `height >= min_size` (or the full image
//!   dimension when the image is smaller than `min_size`)
//!
//! Resizes always start from the current rectangle rather than a snapshot
//! taken at drag start, so reversing direction mid-drag accumulates no error.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::aspect::AspectRatio;
use crate::config::CropConfig;
use crate::geometry::{clamp_span, fit_ratio, Axis, CropRect, ImageExtent, SpanLimits};
use crate::handle::{AnchorRule, AxisRule, Handle, HandleRule};
use crate::interaction::ScaleMapping;
use crate::ParseError;

/// A rectangle value editable through the numeric inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    X,
    Y,
    Width,
    Height,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::X => "x",
            Field::Y => "y",
            Field::Width => "width",
            Field::Height => "height",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Field {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(Field::X),
            "y" => Ok(Field::Y),
            "width" => Ok(Field::Width),
            "height" => Ok(Field::Height),
            _ => Err(ParseError::UnknownField(s.to_string())),
        }
    }
}

/// Crop rectangle, image extent, and aspect ratio for one loaded image.
#[derive(Debug, Clone, PartialEq)]
pub struct CropState {
    config: CropConfig,
    extent: ImageExtent,
    ratio: AspectRatio,
    rect: CropRect,
}

impl CropState {
    /// Initialize the state for a freshly loaded image.
    ///
    /// The rectangle starts centered, sized to `default_fraction` of the
    /// shorter image dimension and capped at `default_max_size`.
    pub fn load(extent: ImageExtent, ratio: AspectRatio, config: CropConfig) -> Self {
        let rect = default_rect(extent, ratio, &config);
        log::debug!(
            "loaded {}x{} image, crop {:?}",
            extent.width(),
            extent.height(),
            rect
        );
        Self {
            config,
            extent,
            ratio,
            rect,
        }
    }

    /// Replace the image, keeping the aspect ratio and configuration.
    pub fn load_image(&mut self, extent: ImageExtent) -> CropRect {
        *self = Self::load(extent, self.ratio, self.config.clone());
        self.rect
    }

    pub fn rect(&self) -> CropRect {
        self.rect
    }

    pub fn extent(&self) -> ImageExtent {
        self.extent
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.ratio
    }

    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    /// Switch the aspect ratio constraint.
    ///
    /// A fixed ratio keeps the top-left corner and the width, derives the
    /// height, then clamps. Switching to free leaves the rectangle alone.
    pub fn set_aspect_ratio(&mut self, ratio: AspectRatio) -> CropRect {
        self.ratio = ratio;
        if let AspectRatio::Fixed(ratio) = ratio {
            let rect = self.rect;
            let (width, height) = fit_ratio(
                Axis::Horizontal,
                rect.width,
                rect.width / ratio,
                ratio,
                self.grow_limits(Axis::Horizontal),
                self.grow_limits(Axis::Vertical),
            );
            self.rect = CropRect::new(rect.x, rect.y, width, height);
        }
        log::debug!("aspect ratio set to {}, crop {:?}", self.ratio, self.rect);
        self.rect
    }

    /// Apply a drag delta measured in screen pixels.
    pub fn apply_handle_delta(
        &mut self,
        handle: Handle,
        dx: f64,
        dy: f64,
        mapping: ScaleMapping,
    ) -> CropRect {
        let (dx, dy) = mapping.to_image(dx, dy);
        self.apply_image_delta(handle, dx, dy)
    }

    /// Apply a drag delta measured in image pixels.
    ///
    /// Non-finite deltas and a zero delta leave the rectangle untouched.
    pub fn apply_image_delta(&mut self, handle: Handle, dx: f64, dy: f64) -> CropRect {
        if !dx.is_finite() || !dy.is_finite() || (dx == 0.0 && dy == 0.0) {
            return self.rect;
        }

        self.rect = match handle.rule() {
            HandleRule::Translate => self.translated(dx, dy),
            HandleRule::Resize(rule) => self.resized(rule, dx, dy),
        };
        log::trace!("{} by ({}, {}) -> {:?}", handle, dx, dy, self.rect);
        self.rect
    }

    /// Set a single value from the numeric inputs.
    ///
    /// Sizes are clamped to the space right/below the rectangle; with a fixed
    /// ratio the other dimension follows. Positions are clamped so the
    /// rectangle stays inside the image. Non-finite values are ignored.
    pub fn set_field(&mut self, field: Field, value: f64) -> CropRect {
        if !value.is_finite() {
            return self.rect;
        }

        let rect = self.rect;
        let width_limits = self.grow_limits(Axis::Horizontal);
        let height_limits = self.grow_limits(Axis::Vertical);

        self.rect = match field {
            Field::X => CropRect {
                x: clamp_span(value, 0.0, self.extent.span(Axis::Horizontal) - rect.width),
                ..rect
            },
            Field::Y => CropRect {
                y: clamp_span(value, 0.0, self.extent.span(Axis::Vertical) - rect.height),
                ..rect
            },
            Field::Width => {
                let (width, height) = match self.ratio {
                    AspectRatio::Free => (width_limits.clamp(value), rect.height),
                    AspectRatio::Fixed(ratio) => fit_ratio(
                        Axis::Horizontal,
                        value,
                        rect.height,
                        ratio,
                        width_limits,
                        height_limits,
                    ),
                };
                CropRect {
                    width,
                    height,
                    ..rect
                }
            }
            Field::Height => {
                let (width, height) = match self.ratio {
                    AspectRatio::Free => (rect.width, height_limits.clamp(value)),
                    AspectRatio::Fixed(ratio) => fit_ratio(
                        Axis::Vertical,
                        rect.width,
                        value,
                        ratio,
                        width_limits,
                        height_limits,
                    ),
                };
                CropRect {
                    width,
                    height,
                    ..rect
                }
            }
        };
        self.rect
    }

    fn min_span(&self, axis: Axis) -> f64 {
        self.extent.min_span(axis, self.config.min_size)
    }

    /// Size limits for growing from the current top-left corner.
    fn grow_limits(&self, axis: Axis) -> SpanLimits {
        AxisRule::MoveFar.limits(
            self.rect.pos(axis),
            self.rect.len(axis),
            self.min_span(axis),
            self.extent.span(axis),
        )
    }

    fn translated(&self, dx: f64, dy: f64) -> CropRect {
        let rect = self.rect;
        let max_x = self.extent.span(Axis::Horizontal) - rect.width;
        let max_y = self.extent.span(Axis::Vertical) - rect.height;
        CropRect {
            x: clamp_span(rect.x + dx, 0.0, max_x),
            y: clamp_span(rect.y + dy, 0.0, max_y),
            ..rect
        }
    }

    fn resized(&self, rule: AnchorRule, dx: f64, dy: f64) -> CropRect {
        // Anchors come from the rectangle as it was before this event
        let prev = self.rect;
        let axis_args = |axis: Axis| {
            (
                prev.pos(axis),
                prev.len(axis),
                self.min_span(axis),
                self.extent.span(axis),
            )
        };

        let (px, pw, min_w, ext_w) = axis_args(Axis::Horizontal);
        let (py, ph, min_h, ext_h) = axis_args(Axis::Vertical);

        let (x, width) = rule.horizontal.resize(px, pw, dx, min_w, ext_w);
        let (y, height) = rule.vertical.resize(py, ph, dy, min_h, ext_h);

        let AspectRatio::Fixed(ratio) = self.ratio else {
            return CropRect::new(x, y, width, height);
        };

        let (width, height) = fit_ratio(
            rule.driver.axis(),
            width,
            height,
            ratio,
            rule.horizontal.limits(px, pw, min_w, ext_w),
            rule.vertical.limits(py, ph, min_h, ext_h),
        );

        CropRect::new(
            rule.horizontal.place(px, pw, width),
            rule.vertical.place(py, ph, height),
            width,
            height,
        )
    }
}

/// Centered default rectangle for a freshly loaded image.
fn default_rect(extent: ImageExtent, ratio: AspectRatio, config: &CropConfig) -> CropRect {
    let image_w = extent.span(Axis::Horizontal);
    let image_h = extent.span(Axis::Vertical);
    let side = config
        .default_max_size
        .min(config.default_fraction * image_w.min(image_h));

    let width_limits = SpanLimits::new(extent.min_span(Axis::Horizontal, config.min_size), image_w);
    let height_limits = SpanLimits::new(extent.min_span(Axis::Vertical, config.min_size), image_h);

    let (width, height) = match ratio {
        AspectRatio::Free => (width_limits.clamp(side), height_limits.clamp(side)),
        AspectRatio::Fixed(ratio) if ratio >= 1.0 => fit_ratio(
            Axis::Horizontal,
            side,
            side / ratio,
            ratio,
            width_limits,
            height_limits,
        ),
        AspectRatio::Fixed(ratio) => fit_ratio(
            Axis::Vertical,
            side * ratio,
            side,
            ratio,
            width_limits,
            height_limits,
        ),
    };

    CropRect::new(
        (image_w - width) / 2.0,
        (image_h - height) / 2.0,
        width,
        height,
    )
}


// ============================================================================
// Property-Based Tests
// ============================================================================
