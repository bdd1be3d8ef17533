//! Crop engine configuration, loadable from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::CropBox;

/// Errors raised while loading or validating a [`CropConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Sizing, zoom and re-encode settings for crop sessions.
///
/// Every field has a default, so a partial TOML table is enough:
///
/// ```toml
/// available_width = 414.0
/// max_zoom = 4.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    /// Screen width the crop surface may occupy, in points.
    pub available_width: f64,
    /// Horizontal space kept free around the crop box (both sides together).
    pub horizontal_padding: f64,
    /// Zoom ceiling, in displayed pixels per natural pixel.
    pub max_zoom: f64,
    /// Multiplier applied by one zoom-in step.
    pub zoom_step: f64,
    /// Multiplier applied by one zoom-out step.
    pub zoom_out_step: f64,
    /// Aspect ratio (width / height) opened right after picking an image.
    pub default_aspect: f64,
    /// JPEG quality for cropped output (1-100).
    pub crop_quality: u8,
    /// JPEG quality for rotated output (1-100).
    pub rotate_quality: u8,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            available_width: 390.0,
            horizontal_padding: 40.0,
            max_zoom: 3.0,
            zoom_step: 1.1,
            zoom_out_step: 0.9,
            default_aspect: AspectPreset::Portrait.ratio(),
            crop_quality: 85,
            rotate_quality: 90,
        }
    }
}

impl CropConfig {
    /// Parse and validate a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: CropConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Width of the crop box once padding is removed.
    pub fn crop_width(&self) -> f64 {
        self.available_width - self.horizontal_padding
    }

    /// Crop box for `aspect` (width / height) under this config.
    pub fn crop_box(&self, aspect: f64) -> CropBox {
        CropBox::from_aspect(self.crop_width(), aspect)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
            ConfigError::InvalidValue {
                field,
                reason: reason.into(),
            }
        }

        if !(self.available_width.is_finite() && self.available_width > 0.0) {
            return Err(invalid("available_width", "must be a positive number"));
        }
        if !(self.horizontal_padding.is_finite() && self.horizontal_padding >= 0.0) {
            return Err(invalid("horizontal_padding", "must be zero or positive"));
        }
        if self.crop_width() < 1.0 {
            return Err(invalid(
                "horizontal_padding",
                format!(
                    "leaves no room for the crop box ({} of {})",
                    self.horizontal_padding, self.available_width
                ),
            ));
        }
        if !(self.max_zoom.is_finite() && self.max_zoom > 0.0) {
            return Err(invalid("max_zoom", "must be a positive number"));
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 1.0) {
            return Err(invalid("zoom_step", "must be greater than 1"));
        }
        if !(self.zoom_out_step > 0.0 && self.zoom_out_step < 1.0) {
            return Err(invalid("zoom_out_step", "must be between 0 and 1"));
        }
        if !is_valid_aspect(self.default_aspect) {
            return Err(invalid("default_aspect", "must be a positive number"));
        }
        Ok(())
    }
}

/// Aspect ratios offered by the crop toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectPreset {
    /// 4:5, the default for new posts.
    #[default]
    Portrait,
    /// 1:1
    Square,
}

impl AspectPreset {
    /// Width divided by height.
    pub fn ratio(self) -> f64 {
        match self {
            AspectPreset::Portrait => 4.0 / 5.0,
            AspectPreset::Square => 1.0,
        }
    }
}

pub(crate) fn is_valid_aspect(aspect: f64) -> bool {
    aspect.is_finite() && aspect > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        let config = CropConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.crop_width(), 350.0);
        assert_eq!(config.crop_box(AspectPreset::Square.ratio()), CropBox::new(350.0, 350.0));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = CropConfig::from_toml_str("available_width = 414.0\nmax_zoom = 4.0\n").unwrap();
        assert_eq!(config.available_width, 414.0);
        assert_eq!(config.max_zoom, 4.0);
        assert_eq!(config.zoom_step, 1.1);
        assert_eq!(config.zoom_out_step, 0.9);
        assert_eq!(config.crop_quality, 85);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = CropConfig::from_toml_str("zoom_step = 0.9").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "zoom_step",
                ..
            }
        ));

        let err = CropConfig::from_toml_str("available_width = 30.0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "horizontal_padding",
                ..
            }
        ));

        let err = CropConfig::from_toml_str("zoom_out_step = 1.0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "zoom_out_step",
                ..
            }
        ));

        let err = CropConfig::from_toml_str("default_aspect = 0.0").unwrap_err();
        assert!(err.to_string().contains("default_aspect"));
    }

    #[test]
    fn test_malformed_toml() {
        let err = CropConfig::from_toml_str("max_zoom = \"lots\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "crop_quality = 70").unwrap();

        let config = CropConfig::load(file.path()).unwrap();
        assert_eq!(config.crop_quality, 70);
    }

    #[test]
    fn test_load_missing_file() {
        let err = CropConfig::load("/nonexistent/framez.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = CropConfig {
            max_zoom: 5.0,
            ..Default::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(CropConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_aspect_presets() {
        assert_eq!(AspectPreset::default(), AspectPreset::Portrait);
        assert_eq!(AspectPreset::Portrait.ratio(), 0.8);
        assert_eq!(AspectPreset::Square.ratio(), 1.0);
        assert_eq!(CropConfig::default().default_aspect, AspectPreset::Portrait.ratio());
    }
}
