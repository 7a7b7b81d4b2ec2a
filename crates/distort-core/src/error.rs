//! Error types for the distortion pipeline.
//!
//! Errors are organized by concern so each message carries the file path and
//! the stage that failed. The batch driver never propagates per-file errors;
//! it records them as skip reasons in the run summary.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for distort operations.
#[derive(Error, Debug)]
pub enum DistortError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Pipeline errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Source file could not be read or decoded
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Neither the content nor the extension identify a known format
    #[error("Unsupported format for {path}: {format}")]
    UnsupportedFormat { path: PathBuf, format: String },

    /// The destination format could not encode the working image
    #[error("Encode error for {path}: {message}")]
    Encode { path: PathBuf, message: String },

    /// Writing the destination file failed
    #[error("Write error for {path}: {message}")]
    Write { path: PathBuf, message: String },

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// The input directory could not be listed
    #[error("Cannot read input directory {path}: {message}")]
    InputDirectory { path: PathBuf, message: String },
}

impl PipelineError {
    /// Short stage label used in reports and logs.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Decode { .. }
            | PipelineError::UnsupportedFormat { .. }
            | PipelineError::FileNotFound(_) => "decode",
            PipelineError::Encode { .. } | PipelineError::Write { .. } => "write",
            PipelineError::InputDirectory { .. } => "listing",
        }
    }
}

/// Convenience type alias for distort results.
pub type Result<T> = std::result::Result<T, DistortError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
