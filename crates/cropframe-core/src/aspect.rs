//! Aspect ratio constraint.
//!
//! A ratio is stored as `width / height`. The selector on the page exchanges
//! it as a string (`"free"`, `"1.5"`, ...); `w:h` pairs such as `"16:9"` are
//! accepted as well.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ParseError;

/// Aspect ratio constraint applied to every rectangle mutation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AspectRatio {
    /// No constraint
    #[default]
    Free,
    /// Fixed `width / height`, always finite and positive
    Fixed(f64),
}

impl AspectRatio {
    /// Create a fixed ratio, or `None` if `ratio` is not finite and positive.
    pub fn fixed(ratio: f64) -> Option<Self> {
        (ratio.is_finite() && ratio > 0.0).then_some(AspectRatio::Fixed(ratio))
    }

    /// The ratio value, or `None` when unconstrained.
    pub fn ratio(&self) -> Option<f64> {
        match self {
            AspectRatio::Free => None,
            AspectRatio::Fixed(ratio) => Some(*ratio),
        }
    }

    pub fn is_free(&self) -> bool {
        matches!(self, AspectRatio::Free)
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AspectRatio::Free => f.write_str("free"),
            AspectRatio::Fixed(ratio) => write!(f, "{}", ratio),
        }
    }
}

impl FromStr for AspectRatio {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.eq_ignore_ascii_case("free") {
            return Ok(AspectRatio::Free);
        }

        let invalid = || ParseError::InvalidAspectRatio(s.to_string());
        let ratio = match value.split_once(':') {
            Some((w, h)) => {
                let w: f64 = w.trim().parse().map_err(|_| invalid())?;
                let h: f64 = h.trim().parse().map_err(|_| invalid())?;
                w / h
            }
            None => value.parse().map_err(|_| invalid())?,
        };

        AspectRatio::fixed(ratio).ok_or_else(invalid)
    }
}

impl TryFrom<String> for AspectRatio {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AspectRatio> for String {
    fn from(ratio: AspectRatio) -> Self {
        ratio.to_string()
    }
}

/// An entry of the aspect ratio selector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectPreset {
    pub label: &'static str,
    pub ratio: AspectRatio,
}

/// Ratios offered by the selector, in display order.
pub const PRESETS: [AspectPreset; 6] = [
    AspectPreset {
        label: "FreeForm",
        ratio: AspectRatio::Free,
    },
    AspectPreset {
        label: "1:1 (Square)",
        ratio: AspectRatio::Fixed(1.0),
    },
    AspectPreset {
        label: "4:5",
        ratio: AspectRatio::Fixed(0.8),
    },
    AspectPreset {
        label: "3:2",
        ratio: AspectRatio::Fixed(1.5),
    },
    AspectPreset {
        label: "16:9",
        ratio: AspectRatio::Fixed(1.7778),
    },
    AspectPreset {
        label: "9:16",
        ratio: AspectRatio::Fixed(0.5625),
    },
];
