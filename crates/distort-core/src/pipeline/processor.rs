//! Pipeline orchestration: decode, apply the gated steps, encode.

use rand::Rng;
use std::path::Path;

use crate::config::{Config, DistortionConfig};
use crate::error::{ConfigError, PipelineResult};
use crate::types::{FileOutcome, SkipReason, WrittenImage};

use super::canvas::Canvas;
use super::decode::{format_to_string, ImageDecoder};
use super::encode::ImageEncoder;
use super::plan::DistortionPlan;
use super::stages;

/// Applies randomized distortions to single images.
#[derive(Debug, Clone)]
pub struct DistortionPipeline {
    config: DistortionConfig,
}

impl DistortionPipeline {
    /// Create a pipeline with the distortion ranges from `config`.
    ///
    /// Fails if the configuration does not validate.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config: config.distortion.clone(),
        })
    }

    /// Draw the decisions for one image.
    pub fn plan<R: Rng>(&self, rng: &mut R) -> DistortionPlan {
        DistortionPlan::sample(rng, &self.config)
    }

    /// Apply a plan in place. Steps run in fixed order and each one sees the
    /// result of the previous.
    pub fn apply(&self, canvas: &mut Canvas, plan: &DistortionPlan) {
        if let Some(degrees) = plan.rotation_degrees {
            stages::rotate(canvas, degrees);
        }
        if let Some(size) = plan.blur_kernel {
            stages::blur(canvas, size);
        }
        if let Some(seed) = plan.noise_seed {
            stages::add_noise(canvas, self.config.noise_stddev, seed);
        }
        if let Some(delta) = plan.brightness {
            stages::brighten(canvas, delta);
        }
        if let Some(alpha) = plan.contrast {
            stages::scale_contrast(canvas, alpha);
        }
    }

    /// Decode `source`, apply `plan` and write the result to `destination`.
    pub fn process(
        &self,
        source: &Path,
        destination: &Path,
        plan: &DistortionPlan,
    ) -> PipelineResult<WrittenImage> {
        let start = std::time::Instant::now();
        tracing::debug!("Processing: {:?}", source);

        let decoded = ImageDecoder::decode(source)?;
        let decode_time = start.elapsed();
        tracing::trace!("  Decode: {:?}", decode_time);

        let mut canvas = decoded.canvas;
        let (width, height, channels) = (canvas.width(), canvas.height(), canvas.channels());

        let distort_start = std::time::Instant::now();
        self.apply(&mut canvas, plan);
        tracing::trace!("  Distort ({}): {:?}", plan, distort_start.elapsed());

        let encode_start = std::time::Instant::now();
        ImageEncoder::write(canvas, destination)?;
        tracing::trace!("  Encode: {:?}", encode_start.elapsed());

        tracing::debug!(
            "Wrote {:?} in {:?} ({}x{}, {})",
            destination,
            start.elapsed(),
            width,
            height,
            plan
        );

        Ok(WrittenImage {
            width,
            height,
            channels,
            source_format: format_to_string(decoded.format),
            plan: *plan,
        })
    }

    /// Best-effort variant of [`process`](Self::process): samples a plan from
    /// `rng` and turns any failure into a skip outcome.
    pub fn distort_file<R: Rng>(
        &self,
        source: &Path,
        destination: &Path,
        rng: &mut R,
    ) -> FileOutcome {
        let plan = self.plan(rng);
        self.run_planned(source, destination, &plan)
    }

    /// Run a pre-sampled plan, recording failures as skips.
    pub(crate) fn run_planned(
        &self,
        source: &Path,
        destination: &Path,
        plan: &DistortionPlan,
    ) -> FileOutcome {
        match self.process(source, destination, plan) {
            Ok(written) => FileOutcome::Written(written),
            Err(e) => {
                tracing::warn!("Skipped {:?}: {}", source, e);
                FileOutcome::Skipped(SkipReason::from(&e))
            }
        }
    }
}
