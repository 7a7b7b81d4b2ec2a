//! Image distortion pipeline components.
//!
//! - **canvas**: the 8-bit working image in its native channel layout
//! - **decode**: load and decode images with content sniffing
//! - **encode**: write the result in the destination's format
//! - **plan**: per-file gates and sampled parameters
//! - **stages**: rotation, blur, noise, brightness and contrast
//! - **discovery**: list the regular files of an input directory
//! - **processor**: one file through the full pipeline
//! - **batch**: a whole directory, with a per-file summary

pub mod batch;
pub mod canvas;
pub mod decode;
pub mod discovery;
pub mod encode;
pub mod plan;
pub mod processor;
pub mod stages;

// Re-exports for convenient access
pub use batch::BatchDriver;
pub use canvas::Canvas;
pub use decode::{DecodedImage, ImageDecoder};
pub use discovery::{DiscoveredFile, FileDiscovery, Listing};
pub use encode::ImageEncoder;
pub use plan::DistortionPlan;
pub use processor::DistortionPipeline;
