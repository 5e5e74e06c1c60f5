//! Immutable tuning constants for camera gestures and drawing.

use std::f64::consts::PI;
use std::path::Path;

use serde::Deserialize;

use crate::errors::ConfigError;

/// Speeds, sizes and tolerances shared by the view and the renderer.
///
/// Every field has a default, so a JSON file only needs the values it changes.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Degrees of rotation per pixel of pointer travel (vertical, horizontal).
    pub rotate_speed: [f64; 2],
    /// Pixels of pan per pixel of pointer travel (horizontal, vertical).
    pub move_speed: [f64; 2],
    /// Scroll units that double or halve the scale.
    pub scale_speed: f64,
    /// Share of the canvas the model fills after fit-to-canvas.
    pub fit_margin: f64,
    /// Arrow head length as a fraction of the shaft.
    pub arrow_size: f64,
    /// Angle between arrow head strokes and the shaft, in radians.
    pub arrow_theta: f64,
    /// Segments used to approximate a circle.
    pub circle_division: usize,
    /// Smallest depth accepted by the perspective divide.
    pub epsilon: f64,
    /// Length of normal and axis indicators in pixels.
    pub normal_size: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            rotate_speed: [0.01, 0.01],
            move_speed: [0.05, 0.05],
            scale_speed: 500.0,
            fit_margin: 0.9,
            arrow_size: 0.3,
            arrow_theta: 10.0 * PI / 180.0,
            circle_division: 8,
            epsilon: 1.0e-4,
            normal_size: 20.0,
        }
    }
}

impl RenderConfig {
    /// Read a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] or [`ConfigError::Parse`].
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: RenderConfig =
            serde_json::from_str(r#"{"scale_speed": 250.0}"#).expect("parses");
        assert_eq!(config.scale_speed, 250.0);
        assert_eq!(config.circle_division, 8);
        assert_eq!(config.move_speed, [0.05, 0.05]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let error = RenderConfig::from_json_file("/nonexistent/framex.json")
            .expect_err("file does not exist");
        assert!(matches!(error, ConfigError::Io(_)));
    }
}
