//! Per-file results and the batch summary.
//!
//! A batch never fails because of a single file: every candidate ends up as a
//! `FileReport`, and the reports are collected into a `BatchSummary`.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{PipelineError, Result};
use crate::pipeline::DistortionPlan;

/// Details of a successfully written output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WrittenImage {
    /// Image width in pixels (unchanged by every step)
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Channels per pixel of the working image
    pub channels: usize,

    /// Detected source format ("jpeg", "png", ...)
    pub source_format: String,

    /// Steps that were applied
    pub plan: DistortionPlan,
}

/// Why a file produced no output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipStage {
    /// The source could not be read or decoded
    Decode,
    /// The output could not be encoded or written
    Write,
}

/// A skipped file with the stage and underlying message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkipReason {
    pub stage: SkipStage,
    pub message: String,
}

impl From<&PipelineError> for SkipReason {
    fn from(err: &PipelineError) -> Self {
        let stage = match err.stage() {
            "write" => SkipStage::Write,
            _ => SkipStage::Decode,
        };
        Self {
            stage,
            message: err.to_string(),
        }
    }
}

/// Outcome of running the pipeline on one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Written(WrittenImage),
    Skipped(SkipReason),
}

/// One input file and what happened to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    /// Source file
    pub source: PathBuf,

    /// Destination file (same base name, output directory)
    pub destination: PathBuf,

    /// Result
    pub outcome: FileOutcome,
}

impl FileReport {
    /// Whether an output file was written.
    pub fn is_written(&self) -> bool {
        matches!(self.outcome, FileOutcome::Written(_))
    }
}

/// Everything a batch run did.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Input directory
    pub input: PathBuf,

    /// Output directory
    pub output: PathBuf,

    /// Seed of the run generator, for replaying the run
    pub seed: u64,

    /// One report per regular file, in processing order
    pub files: Vec<FileReport>,

    /// Entries that were not regular files
    pub ignored_entries: usize,

    /// Set when the input directory could not be listed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_error: Option<String>,

    /// Wall-clock duration of the run
    pub total_seconds: f64,
}

impl BatchSummary {
    /// Files that produced an output.
    pub fn written(&self) -> usize {
        self.files.iter().filter(|f| f.is_written()).count()
    }

    /// Files skipped at the given stage.
    pub fn skipped_at(&self, stage: SkipStage) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(&f.outcome, FileOutcome::Skipped(r) if r.stage == stage))
            .count()
    }

    /// Files skipped for any reason.
    pub fn skipped(&self) -> usize {
        self.files.len() - self.written()
    }

    /// Write the summary as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Processing rate in images per second.
    pub fn images_per_second(&self) -> f64 {
        if self.total_seconds > 0.0 {
            self.files.len() as f64 / self.total_seconds
        } else {
            0.0
        }
    }
}
