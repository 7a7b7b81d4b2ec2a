//! Distort Core - randomized image distortion for whole folders.
//!
//! Every regular file in an input directory is decoded, run through up to
//! five coin-flip-gated distortions and written under the same name into an
//! output directory.
//!
//! # Architecture
//!
//! ```text
//! Input dir → Discover → Plan (seeded) → Decode → Rotate → Blur → Noise
//!           → Brightness → Contrast → Encode → Output dir
//! ```
//!
//! A batch never aborts on a single file. Undecodable sources and failed
//! writes are recorded in the returned [`BatchSummary`].
//!
//! # Usage
//!
//! ```rust,no_run
//! use distort_core::{BatchDriver, Config};
//! use std::path::Path;
//!
//! fn main() -> distort_core::Result<()> {
//!     let config = Config::load()?;
//!     let driver = BatchDriver::new(&config)?;
//!
//!     let summary = driver.run(Path::new("./photos"), Path::new("./distorted"));
//!     println!("{} written, {} skipped", summary.written(), summary.skipped());
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod pipeline;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, DistortError, PipelineError, PipelineResult, Result};
pub use pipeline::{BatchDriver, Canvas, DistortionPipeline, DistortionPlan, FileDiscovery};
pub use types::{BatchSummary, FileOutcome, FileReport, SkipReason, SkipStage, WrittenImage};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run one batch with the given configuration.
///
/// Convenience wrapper for front ends that only need the
/// (input, output) → summary call. Only an invalid configuration fails;
/// per-file problems end up in the summary.
pub fn distort_folder(
    input: &std::path::Path,
    output: &std::path::Path,
    config: &Config,
) -> Result<BatchSummary> {
    tracing::debug!("distort-core v{}", VERSION);
    Ok(BatchDriver::new(config)?.run(input, output))
}
