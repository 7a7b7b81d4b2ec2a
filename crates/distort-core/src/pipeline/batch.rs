//! Batch driver: one input directory in, one output directory out.
//!
//! The driver seeds a single generator per run and samples every file's plan
//! from it in listing order before any image is touched. Files are then run
//! either sequentially or on a rayon pool; because the plans are fixed up
//! front, a seeded run produces the same outputs for any worker count.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::Config;
use crate::error::{ConfigError, PipelineError};
use crate::types::{BatchSummary, FileReport};

use super::discovery::{DiscoveredFile, FileDiscovery, Listing};
use super::plan::DistortionPlan;
use super::processor::DistortionPipeline;

/// One file with its destination and pre-sampled plan.
struct Job {
    file: DiscoveredFile,
    destination: PathBuf,
    plan: DistortionPlan,
}

/// Runs the distortion pipeline over every regular file of a directory.
pub struct BatchDriver {
    pipeline: DistortionPipeline,
    discovery: FileDiscovery,
    parallel_workers: usize,
    seed: Option<u64>,
}

impl BatchDriver {
    /// Create a driver from configuration.
    ///
    /// Fails if the configuration does not validate.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            pipeline: DistortionPipeline::new(config)?,
            discovery: FileDiscovery::new(config.processing.clone()),
            parallel_workers: config.processing.parallel_workers.max(1),
            seed: config.processing.seed,
        })
    }

    /// The per-image pipeline this driver runs.
    pub fn pipeline(&self) -> &DistortionPipeline {
        &self.pipeline
    }

    /// Process every regular file in `input`, writing into `output`.
    ///
    /// Never fails: unreadable inputs, undecodable files and failed writes
    /// are recorded in the summary. `output` must already exist.
    pub fn run(&self, input: &Path, output: &Path) -> BatchSummary {
        self.run_with_progress(input, output, |_| {})
    }

    /// Like [`run`](Self::run), calling `on_file` as each file finishes.
    pub fn run_with_progress<F>(&self, input: &Path, output: &Path, on_file: F) -> BatchSummary
    where
        F: Fn(&FileReport) + Sync,
    {
        let listing = self.discover(input);
        self.run_listing(input, output, listing, on_file)
    }

    /// List the candidate files of `input` with this driver's settings.
    ///
    /// Front ends that need the file count up front list once and hand the
    /// result to [`run_listing`](Self::run_listing).
    pub fn discover(&self, input: &Path) -> Result<Listing, PipelineError> {
        self.discovery.discover(input)
    }

    /// Process exactly the files of an existing listing of `input`.
    pub fn run_listing<F>(
        &self,
        input: &Path,
        output: &Path,
        listing: Result<Listing, PipelineError>,
        on_file: F,
    ) -> BatchSummary
    where
        F: Fn(&FileReport) + Sync,
    {
        let start = Instant::now();
        let seed = self.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);

        let mut summary = BatchSummary {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            seed,
            ..Default::default()
        };

        let listing = match listing {
            Ok(listing) => listing,
            Err(e) => {
                tracing::warn!("{}", e);
                summary.listing_error = Some(e.to_string());
                summary.total_seconds = start.elapsed().as_secs_f64();
                return summary;
            }
        };
        summary.ignored_entries = listing.ignored;
        tracing::info!(
            "Found {} file(s) in {:?} (seed {})",
            listing.files.len(),
            input,
            seed
        );

        let jobs: Vec<Job> = listing
            .files
            .into_iter()
            .map(|file| Job {
                destination: output.join(&file.file_name),
                plan: self.pipeline.plan(&mut rng),
                file,
            })
            .collect();

        summary.files = if self.parallel_workers > 1 && jobs.len() > 1 {
            self.run_parallel(&jobs, &on_file)
        } else {
            jobs.iter().map(|job| self.run_job(job, &on_file)).collect()
        };

        summary.total_seconds = start.elapsed().as_secs_f64();
        tracing::info!(
            "Batch finished: {} written, {} skipped in {:.1}s",
            summary.written(),
            summary.skipped(),
            summary.total_seconds
        );
        summary
    }

    fn run_parallel<F>(&self, jobs: &[Job], on_file: &F) -> Vec<FileReport>
    where
        F: Fn(&FileReport) + Sync,
    {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.parallel_workers)
            .build()
        {
            Ok(pool) => pool.install(|| {
                jobs.par_iter()
                    .map(|job| self.run_job(job, on_file))
                    .collect()
            }),
            Err(e) => {
                tracing::warn!("Cannot start worker pool, running sequentially: {e}");
                jobs.iter().map(|job| self.run_job(job, on_file)).collect()
            }
        }
    }

    fn run_job<F>(&self, job: &Job, on_file: &F) -> FileReport
    where
        F: Fn(&FileReport) + Sync,
    {
        let outcome = self
            .pipeline
            .run_planned(&job.file.path, &job.destination, &job.plan);
        let report = FileReport {
            source: job.file.path.clone(),
            destination: job.destination.clone(),
            outcome,
        };
        on_file(&report);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FileOutcome, SkipStage};
    use image::{ImageBuffer, Rgb, RgbImage};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn gradient(width: u32, height: u32) -> RgbImage {
        ImageBuffer::from_fn(width, height, |x, y| {
            Rgb([(x * 5 % 256) as u8, (y * 9 % 256) as u8, 128])
        })
    }

    fn seeded(seed: u64) -> Config {
        let mut config = Config::default();
        config.processing.seed = Some(seed);
        config
    }

    fn output_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_one_invocation_per_regular_file() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        gradient(16, 16).save(input.path().join("a.png")).unwrap();
        gradient(16, 16).save(input.path().join("b.jpg")).unwrap();
        std::fs::create_dir(input.path().join("sub")).unwrap();
        gradient(4, 4).save(input.path().join("sub").join("c.png")).unwrap();

        let calls = AtomicUsize::new(0);
        let driver = BatchDriver::new(&seeded(1)).unwrap();
        let summary = driver.run_with_progress(input.path(), output.path(), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(summary.files.len(), 2);
        assert_eq!(summary.written(), 2);
        assert_eq!(summary.ignored_entries, 1);
        assert_eq!(output_names(output.path()), vec!["a.png", "b.jpg"]);
    }

    #[test]
    fn test_corrupt_file_produces_no_output() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(input.path().join("bad.dat"), b"\x00\x01garbage").unwrap();
        gradient(12, 9).save(input.path().join("ok.png")).unwrap();

        let summary = BatchDriver::new(&seeded(2))
            .unwrap()
            .run(input.path(), output.path());

        assert_eq!(summary.files.len(), 2);
        assert_eq!(summary.written(), 1);
        assert_eq!(summary.skipped_at(SkipStage::Decode), 1);
        assert_eq!(output_names(output.path()), vec!["ok.png"]);
    }

    #[test]
    fn test_missing_output_directory_writes_nothing() {
        let input = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        let output = scratch.path().join("does-not-exist");
        gradient(8, 8).save(input.path().join("a.png")).unwrap();
        gradient(8, 8).save(input.path().join("b.png")).unwrap();

        let summary = BatchDriver::new(&seeded(3)).unwrap().run(input.path(), &output);

        assert_eq!(summary.written(), 0);
        assert_eq!(summary.skipped_at(SkipStage::Write), 2);
        assert!(!output.exists());
    }

    #[test]
    fn test_unencodable_output_leaves_nothing_behind() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        // PNG content under an .ico name; ICO tops out at 256 pixels
        gradient(300, 300)
            .save_with_format(input.path().join("big.ico"), image::ImageFormat::Png)
            .unwrap();

        let mut config = seeded(6);
        config.distortion.gate_probability = 0.0;
        let summary = BatchDriver::new(&config)
            .unwrap()
            .run(input.path(), output.path());

        assert_eq!(summary.skipped_at(SkipStage::Write), 1);
        assert!(output_names(output.path()).is_empty());
    }

    #[test]
    fn test_invalid_config_is_rejected_up_front() {
        let mut config = seeded(7);
        config.distortion.gate_probability = 1.0;
        config.distortion.contrast_min = 2.0;
        assert!(BatchDriver::new(&config).is_err());
    }

    #[test]
    fn test_run_listing_uses_the_given_listing() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        gradient(8, 8).save(input.path().join("a.png")).unwrap();

        let driver = BatchDriver::new(&seeded(8)).unwrap();
        let listing = driver.discover(input.path());
        assert_eq!(listing.as_ref().unwrap().files.len(), 1);

        // Files added after listing are not picked up
        gradient(8, 8).save(input.path().join("b.png")).unwrap();
        let summary = driver.run_listing(input.path(), output.path(), listing, |_| {});

        assert_eq!(summary.files.len(), 1);
        assert_eq!(output_names(output.path()), vec!["a.png"]);
    }

    #[test]
    fn test_unreadable_input_is_a_noop() {
        let scratch = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();

        let summary = BatchDriver::new(&seeded(4))
            .unwrap()
            .run(&scratch.path().join("nope"), output.path());

        assert!(summary.files.is_empty());
        assert!(summary.listing_error.is_some());
        assert!(output_names(output.path()).is_empty());
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let input = tempfile::tempdir().unwrap();
        for name in ["a.png", "b.png", "c.png", "d.png"] {
            gradient(20, 14).save(input.path().join(name)).unwrap();
        }

        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let driver = BatchDriver::new(&seeded(42)).unwrap();
        let a = driver.run(input.path(), first.path());
        let b = driver.run(input.path(), second.path());
        assert_eq!(a.seed, 42);
        assert_eq!(b.seed, 42);

        for name in output_names(first.path()) {
            let x = std::fs::read(first.path().join(&name)).unwrap();
            let y = std::fs::read(second.path().join(&name)).unwrap();
            assert_eq!(x, y, "{name} differs between seeded runs");
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let input = tempfile::tempdir().unwrap();
        for i in 0..6 {
            gradient(18, 11)
                .save(input.path().join(format!("img{i}.png")))
                .unwrap();
        }

        let sequential_out = tempfile::tempdir().unwrap();
        let parallel_out = tempfile::tempdir().unwrap();

        let sequential = BatchDriver::new(&seeded(9)).unwrap();
        let mut config = seeded(9);
        config.processing.parallel_workers = 3;
        let parallel = BatchDriver::new(&config).unwrap();

        let s = sequential.run(input.path(), sequential_out.path());
        let p = parallel.run(input.path(), parallel_out.path());
        assert_eq!(s.written(), 6);
        assert_eq!(p.written(), 6);

        for (x, y) in s.files.iter().zip(&p.files) {
            assert_eq!(x.source, y.source);
            match (&x.outcome, &y.outcome) {
                (FileOutcome::Written(a), FileOutcome::Written(b)) => assert_eq!(a.plan, b.plan),
                other => panic!("unexpected outcomes {other:?}"),
            }
        }
        for name in output_names(sequential_out.path()) {
            let x = std::fs::read(sequential_out.path().join(&name)).unwrap();
            let y = std::fs::read(parallel_out.path().join(&name)).unwrap();
            assert_eq!(x, y);
        }
    }

    #[test]
    fn test_identity_gates_copy_pixels() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        gradient(10, 10).save(input.path().join("a.png")).unwrap();

        let mut config = seeded(5);
        config.distortion.gate_probability = 0.0;
        let summary = BatchDriver::new(&config)
            .unwrap()
            .run(input.path(), output.path());
        assert_eq!(summary.written(), 1);

        let before = image::open(input.path().join("a.png")).unwrap();
        let after = image::open(output.path().join("a.png")).unwrap();
        assert_eq!(before.as_bytes(), after.as_bytes());
    }
}
