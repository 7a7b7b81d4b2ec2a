//! The five distortion steps.
//!
//! Every step keeps the canvas dimensions and channel layout. Tonal steps
//! (noise, brightness, contrast) saturate at 0 and 255 and never touch alpha.

use image::imageops;
use imageproc::filter::separable_filter_equal;
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};
use imageproc::noise::gaussian_noise_mut;

use super::canvas::{blank_pixel, map_canvas, with_canvas, Canvas};

/// Fixed binomial kernels used for small odd sizes, indexed by `size / 2`.
const SMALL_GAUSSIAN_KERNELS: [&[f32]; 4] = [
    &[1.0],
    &[0.25, 0.5, 0.25],
    &[0.0625, 0.25, 0.375, 0.25, 0.0625],
    &[
        0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125,
    ],
];

/// Rotate counter-clockwise about the image center by whole degrees.
///
/// The canvas keeps its size; corners that leave the frame are clipped and
/// uncovered areas become zero.
pub fn rotate(canvas: &mut Canvas, degrees: u32) {
    if degrees % 360 == 0 {
        return;
    }
    // imageproc rotates clockwise for positive angles
    let theta = -(degrees as f32).to_radians();
    *canvas = map_canvas!(&*canvas, |img| rotate_about_center(
        img,
        theta,
        Interpolation::Bilinear,
        blank_pixel()
    ));
}

/// Normalized 1-D Gaussian kernel for an odd `size`.
///
/// Sizes up to 7 use fixed binomial weights. Larger sizes derive sigma from
/// the size as `0.3 * ((size - 1) / 2 - 1) + 0.8`.
pub fn gaussian_kernel(size: u32) -> Vec<f32> {
    debug_assert!(size % 2 == 1, "kernel size must be odd");
    let half = (size / 2) as usize;
    if let Some(fixed) = SMALL_GAUSSIAN_KERNELS.get(half) {
        return fixed.to_vec();
    }

    let sigma = 0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8;
    let weights: Vec<f32> = (0..size as usize)
        .map(|i| {
            let x = i as f32 - half as f32;
            (-(x * x) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f32 = weights.iter().sum();
    weights.into_iter().map(|w| w / sum).collect()
}

/// Gaussian blur with a square kernel of the given odd size.
///
/// Each of the two passes truncates to `u8`, so non-dyadic weighted sums can
/// come out a level or two darker than exact rounding would give.
pub fn blur(canvas: &mut Canvas, kernel_size: u32) {
    if kernel_size <= 1 {
        return;
    }
    let kernel = gaussian_kernel(kernel_size);
    *canvas = map_canvas!(&*canvas, |img| separable_filter_equal(img, kernel.as_slice()));
}

/// Add zero-mean Gaussian noise, drawn independently per pixel and channel.
pub fn add_noise(canvas: &mut Canvas, stddev: f64, seed: u64) {
    let alpha = canvas.alpha_plane();
    // imageproc truncates when converting back to u8; the 0.5 offset turns
    // that into round-to-nearest, keeping the noise zero-mean.
    with_canvas!(canvas, |img| gaussian_noise_mut(img, 0.5, stddev, seed));
    if let Some(alpha) = alpha {
        canvas.restore_alpha(&alpha);
    }
}

/// Add a constant offset to every color channel.
pub fn brighten(canvas: &mut Canvas, delta: i32) {
    if delta == 0 {
        return;
    }
    *canvas = map_canvas!(&*canvas, |img| imageops::brighten(img, delta));
}

/// Scale every color channel by `alpha`, rounding to nearest.
pub fn scale_contrast(canvas: &mut Canvas, alpha: f64) {
    canvas.map_color_subpixels(|v| (f64::from(v) * alpha).round().clamp(0.0, 255.0) as u8);
}
