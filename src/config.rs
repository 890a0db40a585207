//! Evaluator configuration
//!
//! Defaults reproduce the reference behavior exactly; the knobs only exist for
//! hosts whose trackers emit unusual frames.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ComputeError;

/// Default horizontal reach of single-target boundary lines, in hand widths
pub const DEFAULT_BOUNDARY_EXTENT: f64 = 1.5;

/// Default floor for hand length and hand width
pub const DEFAULT_MIN_EXTENT: f64 = 1e-6;

/// Evaluator configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Half-length of single-target boundary lines, as a multiple of hand width
    pub boundary_extent: f64,
    /// Hand length and width are clamped to at least this value
    pub min_extent: f64,
    /// Reject frames with more than 21 landmarks instead of ignoring the extras
    pub strict_landmark_count: bool,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            boundary_extent: DEFAULT_BOUNDARY_EXTENT,
            min_extent: DEFAULT_MIN_EXTENT,
            strict_landmark_count: true,
        }
    }
}

impl EvaluatorConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ComputeError> {
        if !self.boundary_extent.is_finite() || self.boundary_extent <= 0.0 {
            return Err(ComputeError::ConfigError(format!(
                "boundary_extent must be positive, got {}",
                self.boundary_extent
            )));
        }
        if !self.min_extent.is_finite() || self.min_extent <= 0.0 {
            return Err(ComputeError::ConfigError(format!(
                "min_extent must be positive, got {}",
                self.min_extent
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ComputeError> {
        let config: EvaluatorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file
    pub fn load(path: &Path) -> Result<Self, ComputeError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ComputeError::ConfigError(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> Result<String, ComputeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
