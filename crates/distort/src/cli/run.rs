//! The `distort run` command: one input folder, one output folder.

use clap::Args;
use distort_core::{BatchDriver, BatchSummary, Config, FileOutcome, FileReport, SkipStage};
use std::path::PathBuf;

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Folder with the source images
    #[arg(required = true)]
    pub input: PathBuf,

    /// Existing folder that receives the distorted images
    #[arg(required = true)]
    pub output: PathBuf,

    /// Seed for the run generator (random when omitted)
    #[arg(long, env = "DISTORT_SEED")]
    pub seed: Option<u64>,

    /// Number of parallel workers
    #[arg(short, long)]
    pub parallel: Option<usize>,

    /// Process files sorted by name instead of directory order
    #[arg(long)]
    pub sort: bool,

    /// Probability that each distortion step runs
    #[arg(long)]
    pub gate_probability: Option<f64>,

    /// Write a JSON report of every file to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

/// Manual Default impl for constructing RunArgs outside of clap.
///
/// Used by the interactive module after both folders are chosen.
impl Default for RunArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: PathBuf::new(),
            seed: None,
            parallel: None,
            sort: false,
            gate_probability: None,
            report: None,
            no_progress: false,
        }
    }
}

impl RunArgs {
    /// Apply command-line overrides on top of the loaded configuration.
    fn effective_config(&self, base: &Config) -> anyhow::Result<Config> {
        let mut config = base.clone();
        if let Some(seed) = self.seed {
            config.processing.seed = Some(seed);
        }
        if let Some(parallel) = self.parallel {
            config.processing.parallel_workers = parallel;
        }
        if self.sort {
            config.processing.sort_entries = true;
        }
        if let Some(p) = self.gate_probability {
            config.distortion.gate_probability = p;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Execute the run command.
pub fn execute(args: RunArgs, base: &Config) -> anyhow::Result<BatchSummary> {
    let config = args.effective_config(base)?;

    if !args.output.is_dir() {
        tracing::warn!(
            "Output folder {:?} does not exist; no files will be written",
            args.output
        );
    }

    let driver = BatchDriver::new(&config)?;
    let listing = driver.discover(&args.input);
    let expected = listing.as_ref().map(|l| l.files.len()).unwrap_or(0);
    if expected == 0 {
        tracing::warn!("No files found in {:?}", args.input);
    } else {
        tracing::info!("Found {} file(s) to distort", expected);
    }

    let progress = if args.no_progress {
        indicatif::ProgressBar::hidden()
    } else {
        create_progress_bar(expected as u64)
    };

    let summary = driver.run_listing(&args.input, &args.output, listing, |report| {
        progress.inc(1);
        if let FileOutcome::Skipped(reason) = &report.outcome {
            progress.set_message(format!("skipped {}", file_label(report)));
            tracing::debug!("{}", reason.message);
        }
    });
    progress.finish_and_clear();

    if let Some(report_path) = &args.report {
        summary.write_json(report_path)?;
        tracing::info!("Report written to {:?}", report_path);
    }

    print_summary(&summary);
    eprintln!("Image processing complete!");

    Ok(summary)
}

fn file_label(report: &FileReport) -> String {
    report
        .source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| report.source.display().to_string())
}

/// Create a progress bar for batch processing.
fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
    pb.set_style(style);
    pb.set_message("starting...");
    pb
}

/// Print a formatted summary table after the batch.
fn print_summary(summary: &BatchSummary) {
    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    if let Some(err) = &summary.listing_error {
        eprintln!("    Input unreadable: {}", err);
    }
    eprintln!("    Written:      {:>8}", summary.written());
    let decode = summary.skipped_at(SkipStage::Decode);
    if decode > 0 {
        eprintln!("    Not images:   {:>8}", decode);
    }
    let write = summary.skipped_at(SkipStage::Write);
    if write > 0 {
        eprintln!("    Write failed: {:>8}", write);
    }
    if summary.ignored_entries > 0 {
        eprintln!("    Ignored:      {:>8}", summary.ignored_entries);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Total:        {:>8}", summary.files.len());
    eprintln!("    Seed:         {:>8}", summary.seed);
    eprintln!("    Duration:     {:>7.1}s", summary.total_seconds);
    eprintln!("    Rate:         {:>7.1} img/sec", summary.images_per_second());
    eprintln!("  ====================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb, RgbImage};

    fn sample() -> RgbImage {
        ImageBuffer::from_fn(12, 12, |x, y| Rgb([(x * 20) as u8, (y * 20) as u8, 90]))
    }

    #[test]
    fn run_args_default_has_no_overrides() {
        let args = RunArgs::default();
        assert!(args.seed.is_none());
        assert!(args.parallel.is_none());
        assert!(args.gate_probability.is_none());
        assert!(args.report.is_none());
        assert!(!args.sort);
        assert!(!args.no_progress);
    }

    #[test]
    fn overrides_are_applied() {
        let args = RunArgs {
            seed: Some(5),
            parallel: Some(3),
            sort: true,
            gate_probability: Some(0.25),
            ..RunArgs::default()
        };
        let config = args.effective_config(&Config::default()).unwrap();
        assert_eq!(config.processing.seed, Some(5));
        assert_eq!(config.processing.parallel_workers, 3);
        assert!(config.processing.sort_entries);
        assert_eq!(config.distortion.gate_probability, 0.25);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let args = RunArgs {
            gate_probability: Some(3.0),
            ..RunArgs::default()
        };
        assert!(args.effective_config(&Config::default()).is_err());
    }

    #[test]
    fn execute_writes_outputs_and_report() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        sample().save(input.path().join("a.png")).unwrap();
        std::fs::write(input.path().join("notes.txt"), b"hello").unwrap();
        let report = scratch.path().join("report.json");

        let args = RunArgs {
            input: input.path().to_path_buf(),
            output: output.path().to_path_buf(),
            seed: Some(1),
            report: Some(report.clone()),
            no_progress: true,
            ..RunArgs::default()
        };
        let summary = execute(args, &Config::default()).unwrap();
        assert_eq!(summary.written(), 1);
        assert!(output.path().join("a.png").exists());
        assert!(!output.path().join("notes.txt").exists());

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
        assert_eq!(json["seed"], 1);
        assert_eq!(json["files"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn execute_succeeds_when_nothing_is_written() {
        let input = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        sample().save(input.path().join("a.png")).unwrap();

        let args = RunArgs {
            input: input.path().to_path_buf(),
            output: scratch.path().join("missing"),
            no_progress: true,
            ..RunArgs::default()
        };
        let summary = execute(args, &Config::default()).unwrap();
        assert_eq!(summary.written(), 0);
        assert_eq!(summary.skipped_at(SkipStage::Write), 1);
    }
}
