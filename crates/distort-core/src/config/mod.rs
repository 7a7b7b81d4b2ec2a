//! Configuration management for distort.
//!
//! Configuration is loaded from the platform config directory
//! (`~/.config/distort/config.toml` on Linux). Every section has defaults, so
//! a missing file or a partial file is fine.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Batch processing settings
    pub processing: ProcessingConfig,

    /// Distortion ranges
    pub distortion: DistortionConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.distort.distort/config.toml
    /// - Linux: ~/.config/distort/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\distort\config\config.toml
    ///
    /// Falls back to ~/.distort/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "distort", "distort")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".distort").join("config.toml")
            })
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.processing.parallel_workers, 1);
        assert!(config.processing.seed.is_none());
        assert_eq!(config.distortion.gate_probability, 0.5);
        assert_eq!(config.distortion.max_rotation_degrees, 359);
        assert_eq!(config.distortion.brightness_limit, 50);
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[processing]"));
        assert!(toml.contains("[distortion]"));
        assert!(toml.contains("[logging]"));
        assert!(!toml.contains("seed"));
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[processing]\nseed = 42\n\n[distortion]\nnoise_stddev = 12.5\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.processing.seed, Some(42));
        assert_eq!(config.processing.parallel_workers, 1);
        assert_eq!(config.distortion.noise_stddev, 12.5);
        assert_eq!(config.distortion.contrast_max, 1.5);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[distortion]\ngate_probability = 2.0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_load_rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[processing\nseed = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.processing.seed = Some(7);
        config.distortion.max_blur_half_width = 3;

        let parsed: Config = toml::from_str(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed.processing.seed, Some(7));
        assert_eq!(parsed.distortion.max_blur_half_width, 3);
    }
}
