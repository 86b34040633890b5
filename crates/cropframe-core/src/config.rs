//! Editor configuration.
//!
//! The defaults reproduce the cropper's stock behaviour. The page may pass a
//! partial object; missing fields fall back to their defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::MIN_SIZE;

/// Errors for out-of-range configuration values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("min_size must be a positive number, got {0}")]
    InvalidMinSize(f64),

    #[error("default_fraction must be in (0, 1], got {0}")]
    InvalidDefaultFraction(f64),

    #[error("default_max_size must be a positive number, got {0}")]
    InvalidDefaultMaxSize(f64),
}

/// Tunable crop editor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    /// Minimum crop width and height in image pixels
    pub min_size: f64,
    /// Default rectangle side as a fraction of the shorter image dimension
    pub default_fraction: f64,
    /// Upper bound for the default rectangle side in image pixels
    pub default_max_size: f64,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            min_size: MIN_SIZE,
            default_fraction: 0.6,
            default_max_size: 300.0,
        }
    }
}

impl CropConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that every value is usable by the geometry engine.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_size.is_finite() && self.min_size > 0.0) {
            return Err(ConfigError::InvalidMinSize(self.min_size));
        }
        if !(self.default_fraction > 0.0 && self.default_fraction <= 1.0) {
            return Err(ConfigError::InvalidDefaultFraction(self.default_fraction));
        }
        if !(self.default_max_size.is_finite() && self.default_max_size > 0.0) {
            return Err(ConfigError::InvalidDefaultMaxSize(self.default_max_size));
        }
        Ok(())
    }
}
