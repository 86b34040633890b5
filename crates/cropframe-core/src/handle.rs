//! Drag handles and their anchor rules.
//!
//! Every handle maps to a [`HandleRule`]: the rectangle body translates, and
//! each of the eight resize handles carries an [`AnchorRule`] describing which
//! edges move, which stay fixed, and which dimension drives aspect ratio
//! correction.
//!
//! | Handle | Fixed anchor        | Moving edges       |
//! |--------|---------------------|--------------------|
//! | E      | left edge           | right              |
//! | W      | right edge          | left               |
//! | S      | top edge            | bottom             |
//! | N      | bottom edge         | top                |
//! | SE     | top-left corner     | right, bottom      |
//! | SW     | top-right corner    | left, bottom       |
//! | NE     | bottom-left corner  | right, top         |
//! | NW     | bottom-right corner | left, top          |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geometry::{clamp_span, Axis, SpanLimits};
use crate::ParseError;

/// A drag affordance on the crop rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    /// Rectangle body
    Move,
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl Handle {
    pub const ALL: [Handle; 9] = [
        Handle::Move,
        Handle::N,
        Handle::S,
        Handle::E,
        Handle::W,
        Handle::NE,
        Handle::NW,
        Handle::SE,
        Handle::SW,
    ];

    /// Label used by the page (`"move"`, `"n"`, ..., `"sw"`).
    pub fn label(self) -> &'static str {
        match self {
            Handle::Move => "move",
            Handle::N => "n",
            Handle::S => "s",
            Handle::E => "e",
            Handle::W => "w",
            Handle::NE => "ne",
            Handle::NW => "nw",
            Handle::SE => "se",
            Handle::SW => "sw",
        }
    }

    /// Look up how this handle mutates the rectangle.
    pub fn rule(self) -> HandleRule {
        use AxisRule::{Fixed, MoveFar, MoveNear};

        let resize = |horizontal, vertical, driver| {
            HandleRule::Resize(AnchorRule {
                horizontal,
                vertical,
                driver,
            })
        };

        match self {
            Handle::Move => HandleRule::Translate,
            Handle::E => resize(MoveFar, Fixed, RatioDriver::Width),
            Handle::W => resize(MoveNear, Fixed, RatioDriver::Width),
            Handle::S => resize(Fixed, MoveFar, RatioDriver::Height),
            Handle::N => resize(Fixed, MoveNear, RatioDriver::Height),
            Handle::SE => resize(MoveFar, MoveFar, RatioDriver::Width),
            Handle::SW => resize(MoveNear, MoveFar, RatioDriver::Width),
            Handle::NE => resize(MoveFar, MoveNear, RatioDriver::Height),
            Handle::NW => resize(MoveNear, MoveNear, RatioDriver::Width),
        }
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Handle {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Handle::ALL
            .into_iter()
            .find(|handle| handle.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError::UnknownHandle(s.to_string()))
    }
}

/// What a handle does to the rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleRule {
    /// Shift position, keep size
    Translate,
    /// Resize around an anchor
    Resize(AnchorRule),
}

/// Anchor descriptor for a resize handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorRule {
    pub horizontal: AxisRule,
    pub vertical: AxisRule,
    pub driver: RatioDriver,
}

/// Behaviour of one axis during a resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisRule {
    /// Neither edge moves
    Fixed,
    /// The low edge (x or y) moves, the far edge is the anchor
    MoveNear,
    /// The far edge moves, the low edge is the anchor
    MoveFar,
}

impl AxisRule {
    /// Apply `delta` to the span `pos..pos + len`, returning the new `(pos, len)`.
    pub fn resize(self, pos: f64, len: f64, delta: f64, min: f64, extent: f64) -> (f64, f64) {
        match self {
            AxisRule::Fixed => (pos, len),
            AxisRule::MoveFar => (pos, clamp_span(len + delta, min, extent - pos)),
            AxisRule::MoveNear => {
                let anchor = pos + len;
                let len = clamp_span(len - delta, min, anchor);
                (anchor - len, len)
            }
        }
    }

    /// Allowed length range when the anchor is taken from `pos..pos + len`.
    ///
    /// A fixed axis that has to follow a ratio correction grows from its low edge.
    pub fn limits(self, pos: f64, len: f64, min: f64, extent: f64) -> SpanLimits {
        match self {
            AxisRule::MoveNear => SpanLimits::new(min, pos + len),
            AxisRule::Fixed | AxisRule::MoveFar => SpanLimits::new(min, extent - pos),
        }
    }

    /// Low edge position for a span of `new_len` keeping the anchor of `pos..pos + len`.
    pub fn place(self, pos: f64, len: f64, new_len: f64) -> f64 {
        match self {
            AxisRule::MoveNear => pos + len - new_len,
            AxisRule::Fixed | AxisRule::MoveFar => pos,
        }
    }
}

/// Dimension that stays put during aspect ratio correction.
///
/// Every corner except NE keeps its width and derives the height; NE keeps
/// its height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatioDriver {
    Width,
    Height,
}

impl RatioDriver {
    pub fn axis(self) -> Axis {
        match self {
            RatioDriver::Width => Axis::Horizontal,
            RatioDriver::Height => Axis::Vertical,
        }
    }
}
