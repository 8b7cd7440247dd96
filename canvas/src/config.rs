//! Canvas tuning parsed from environment variables.

use crate::consts::{DEFAULT_CONFIDENCE, HANDLE_SIZE_PX, MIN_BOX_PX, MIN_DRAW_PX, MOVE_THRESHOLD_PX};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}: `{value}` is not a number")]
    Parse { var: &'static str, value: String },
    #[error("{var}: {value} is outside {min}..={max}")]
    OutOfRange { var: &'static str, value: f64, min: f64, max: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasConfig {
    /// Handle tolerance in viewport pixels.
    pub handle_size_px: f64,
    /// Minimum resized box size in image pixels.
    pub min_box_px: f64,
    /// Minimum drawn box size in viewport pixels.
    pub min_draw_px: f64,
    /// Pointer travel (viewport pixels) before a press turns into a drag.
    pub move_threshold_px: f64,
    /// Initial confidence filter.
    pub confidence_threshold: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            handle_size_px: HANDLE_SIZE_PX,
            min_box_px: MIN_BOX_PX,
            min_draw_px: MIN_DRAW_PX,
            move_threshold_px: MOVE_THRESHOLD_PX,
            confidence_threshold: DEFAULT_CONFIDENCE,
        }
    }
}

impl CanvasConfig {
    /// Build config from environment variables. Every variable is optional.
    ///
    /// - `MENDER_HANDLE_SIZE_PX`: default 10
    /// - `MENDER_MIN_BOX_PX`: default 4
    /// - `MENDER_MIN_DRAW_PX`: default 5
    /// - `MENDER_MOVE_THRESHOLD_PX`: default 3
    /// - `MENDER_CONFIDENCE`: default 0.25, must lie in `0..=1`
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            handle_size_px: env_f64("MENDER_HANDLE_SIZE_PX", HANDLE_SIZE_PX, 0.0, 100.0)?,
            min_box_px: env_f64("MENDER_MIN_BOX_PX", MIN_BOX_PX, 0.5, 1000.0)?,
            min_draw_px: env_f64("MENDER_MIN_DRAW_PX", MIN_DRAW_PX, 0.0, 1000.0)?,
            move_threshold_px: env_f64("MENDER_MOVE_THRESHOLD_PX", MOVE_THRESHOLD_PX, 0.0, 100.0)?,
            confidence_threshold: env_f64("MENDER_CONFIDENCE", DEFAULT_CONFIDENCE, 0.0, 1.0)?,
        })
    }
}

fn env_f64(var: &'static str, default: f64, min: f64, max: f64) -> Result<f64, ConfigError> {
    let Ok(raw) = std::env::var(var) else {
        return Ok(default);
    };
    parse_bounded(var, &raw, min, max)
}

fn parse_bounded(var: &'static str, raw: &str, min: f64, max: f64) -> Result<f64, ConfigError> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::Parse { var, value: raw.to_string() })?;
    if !(min..=max).contains(&value) {
        return Err(ConfigError::OutOfRange { var, value, min, max });
    }
    Ok(value)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
