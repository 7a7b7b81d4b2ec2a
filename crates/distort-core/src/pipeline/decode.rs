//! Image decoding with content-based format detection.

use image::ImageFormat;
use std::io::Cursor;
use std::path::Path;

use crate::error::PipelineError;

use super::canvas::Canvas;

/// Decodes source files into 8-bit working canvases.
pub struct ImageDecoder;

/// Result of decoding an image.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// The decoded image in its native 8-bit layout
    pub canvas: Canvas,
    /// Detected image format
    pub format: ImageFormat,
    /// Original file size in bytes
    pub file_size: u64,
}

impl ImageDecoder {
    /// Read and decode an image file.
    pub fn decode(path: &Path) -> Result<DecodedImage, PipelineError> {
        if !path.exists() {
            return Err(PipelineError::FileNotFound(path.to_path_buf()));
        }
        let bytes = std::fs::read(path).map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot read file: {}", e),
        })?;
        Self::decode_bytes(bytes, path)
    }

    /// Decode an in-memory file. The format is sniffed from the content
    /// first; the extension of `path` is only a fallback.
    pub fn decode_bytes(bytes: Vec<u8>, path: &Path) -> Result<DecodedImage, PipelineError> {
        let file_size = bytes.len() as u64;
        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| PipelineError::Decode {
                path: path.to_path_buf(),
                message: format!("Cannot detect image format: {}", e),
            })?;

        let format = match reader.format() {
            Some(f) => f,
            None => ImageFormat::from_path(path).map_err(|_| PipelineError::UnsupportedFormat {
                path: path.to_path_buf(),
                format: path
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("unknown")
                    .to_string(),
            })?,
        };

        let mut reader = reader;
        reader.set_format(format);
        let image = reader.decode().map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(DecodedImage {
            canvas: Canvas::from(image),
            format,
            file_size,
        })
    }
}

/// Convert an ImageFormat to a string representation.
pub fn format_to_string(format: ImageFormat) -> String {
    match format {
        ImageFormat::Jpeg => "jpeg".to_string(),
        ImageFormat::Png => "png".to_string(),
        ImageFormat::WebP => "webp".to_string(),
        ImageFormat::Gif => "gif".to_string(),
        ImageFormat::Tiff => "tiff".to_string(),
        ImageFormat::Bmp => "bmp".to_string(),
        ImageFormat::Ico => "ico".to_string(),
        ImageFormat::Pnm => "pnm".to_string(),
        ImageFormat::Tga => "tga".to_string(),
        ImageFormat::Avif => "avif".to_string(),
        _ => "unknown".to_string(),
    }
}
