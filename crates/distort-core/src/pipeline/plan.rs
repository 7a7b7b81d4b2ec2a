//! Per-file distortion decisions.
//!
//! A plan holds the outcome of the five coin flips together with the sampled
//! parameter for each step that won its flip. Plans are drawn from the batch
//! run's generator, so a seeded run reproduces every decision.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::DistortionConfig;

/// Sampled gates and parameters for one file. `None` means the step is off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DistortionPlan {
    /// Counter-clockwise rotation in whole degrees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation_degrees: Option<u32>,

    /// Odd Gaussian kernel size (1, 3, 5, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blur_kernel: Option<u32>,

    /// Seed for the per-pixel noise field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noise_seed: Option<u64>,

    /// Offset added to every color channel
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<i32>,

    /// Multiplier applied to every color channel
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contrast: Option<f64>,
}

impl DistortionPlan {
    /// The plan with every gate off. Applying it leaves the image unchanged.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Draw a plan: one flip per step, in pipeline order, each followed by
    /// its parameter when the flip succeeds.
    pub fn sample<R: Rng>(rng: &mut R, config: &DistortionConfig) -> Self {
        let p = config.gate_probability;

        let rotation_degrees = rng
            .gen_bool(p)
            .then(|| rng.gen_range(0..=config.max_rotation_degrees));

        let blur_kernel = rng
            .gen_bool(p)
            .then(|| 1 + 2 * rng.gen_range(0..=config.max_blur_half_width));

        let noise_seed = rng.gen_bool(p).then(|| rng.gen::<u64>());

        let brightness = rng
            .gen_bool(p)
            .then(|| rng.gen_range(-config.brightness_limit..=config.brightness_limit));

        let contrast = rng
            .gen_bool(p)
            .then(|| rng.gen_range(config.contrast_min..=config.contrast_max));

        Self {
            rotation_degrees,
            blur_kernel,
            noise_seed,
            brightness,
            contrast,
        }
    }

    /// Whether no step is enabled.
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Number of enabled steps.
    pub fn enabled_steps(&self) -> usize {
        [
            self.rotation_degrees.is_some(),
            self.blur_kernel.is_some(),
            self.noise_seed.is_some(),
            self.brightness.is_some(),
            self.contrast.is_some(),
        ]
        .into_iter()
        .filter(|on| *on)
        .count()
    }
}

impl std::fmt::Display for DistortionPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if let Some(deg) = self.rotation_degrees {
            parts.push(format!("rotate {deg}°"));
        }
        if let Some(k) = self.blur_kernel {
            parts.push(format!("blur {k}x{k}"));
        }
        if self.noise_seed.is_some() {
            parts.push("noise".to_string());
        }
        if let Some(b) = self.brightness {
            parts.push(format!("brightness {b:+}"));
        }
        if let Some(c) = self.contrast {
            parts.push(format!("contrast x{c:.2}"));
        }
        if parts.is_empty() {
            write!(f, "unchanged")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}
