//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};

/// Batch processing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Number of parallel workers (1 = sequential, in listing order)
    pub parallel_workers: usize,

    /// Process entries sorted by file name instead of directory-listing order
    pub sort_entries: bool,

    /// Fixed seed for the run generator; drawn from OS entropy when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            parallel_workers: 1,
            sort_entries: false,
            seed: None,
        }
    }
}

/// Ranges and gate probability for the five distortion steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DistortionConfig {
    /// Probability that each step runs (independent per step)
    pub gate_probability: f64,

    /// Largest rotation angle in degrees; angles are drawn from [0, max]
    pub max_rotation_degrees: u32,

    /// Largest blur half-width; kernel sizes are `1 + 2k` for k in [0, max]
    pub max_blur_half_width: u32,

    /// Standard deviation of the additive Gaussian noise
    pub noise_stddev: f64,

    /// Brightness offsets are drawn from [-limit, limit]
    pub brightness_limit: i32,

    /// Lower bound of the contrast multiplier
    pub contrast_min: f64,

    /// Upper bound of the contrast multiplier
    pub contrast_max: f64,
}

impl Default for DistortionConfig {
    fn default() -> Self {
        Self {
            gate_probability: 0.5,
            max_rotation_degrees: 359,
            max_blur_half_width: 2,
            noise_stddev: 30.0,
            brightness_limit: 50,
            contrast_min: 0.5,
            contrast_max: 1.5,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
