//! Writing the distorted canvas in the format named by the destination.

use image::{ImageError, ImageFormat};
use std::io::Cursor;
use std::path::Path;

use crate::error::PipelineError;

use super::canvas::Canvas;

/// Encodes canvases to disk.
pub struct ImageEncoder;

impl ImageEncoder {
    /// Encode `canvas` to `path`, choosing the format from the extension.
    ///
    /// The parent directory must already exist.
    pub fn write(canvas: Canvas, path: &Path) -> Result<(), PipelineError> {
        let format = ImageFormat::from_path(path).map_err(|e| PipelineError::Encode {
            path: path.to_path_buf(),
            message: format!("No output format for this extension: {}", e),
        })?;

        // The destination is only created once encoding has succeeded.
        let mut bytes = Cursor::new(Vec::new());
        canvas
            .into_dynamic_for(format)
            .write_to(&mut bytes, format)
            .map_err(|e| match e {
                ImageError::IoError(io) => PipelineError::Write {
                    path: path.to_path_buf(),
                    message: io.to_string(),
                },
                other => PipelineError::Encode {
                    path: path.to_path_buf(),
                    message: other.to_string(),
                },
            })?;

        std::fs::write(path, bytes.into_inner()).map_err(|e| PipelineError::Write {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
