//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.processing.parallel_workers == 0 {
            return Err(ConfigError::ValidationError(
                "processing.parallel_workers must be > 0".into(),
            ));
        }

        let d = &self.distortion;
        if !(0.0..=1.0).contains(&d.gate_probability) {
            return Err(ConfigError::ValidationError(
                "distortion.gate_probability must be between 0.0 and 1.0".into(),
            ));
        }
        if d.max_rotation_degrees >= 360 {
            return Err(ConfigError::ValidationError(
                "distortion.max_rotation_degrees must be < 360".into(),
            ));
        }
        if d.max_blur_half_width > 15 {
            return Err(ConfigError::ValidationError(
                "distortion.max_blur_half_width must be <= 15".into(),
            ));
        }
        if !d.noise_stddev.is_finite() || d.noise_stddev < 0.0 {
            return Err(ConfigError::ValidationError(
                "distortion.noise_stddev must be >= 0".into(),
            ));
        }
        if !(0..=255).contains(&d.brightness_limit) {
            return Err(ConfigError::ValidationError(
                "distortion.brightness_limit must be between 0 and 255".into(),
            ));
        }
        if !d.contrast_min.is_finite() || d.contrast_min < 0.0 {
            return Err(ConfigError::ValidationError(
                "distortion.contrast_min must be >= 0".into(),
            ));
        }
        if !d.contrast_max.is_finite() || d.contrast_max < d.contrast_min {
            return Err(ConfigError::ValidationError(
                "distortion.contrast_max must be >= distortion.contrast_min".into(),
            ));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::ValidationError(
                "logging.format must be \"pretty\" or \"json\"".into(),
            ));
        }
        Ok(())
    }
}
