//! The 8-bit working image that the distortion steps operate on.

use image::{DynamicImage, GrayAlphaImage, GrayImage, ImageFormat, Pixel, RgbImage, RgbaImage};

/// An 8-bit image in the decoder's native channel layout.
///
/// Higher bit depths and float images are converted to the 8-bit layout with
/// the same channel set, so every step works on saturating `u8` subpixels.
#[derive(Debug, Clone, PartialEq)]
pub enum Canvas {
    Gray(GrayImage),
    GrayAlpha(GrayAlphaImage),
    Rgb(RgbImage),
    Rgba(RgbaImage),
}

/// Rebuild the canvas from the same variant with a transformed buffer.
macro_rules! map_canvas {
    ($canvas:expr, |$img:ident| $body:expr) => {
        match $canvas {
            Canvas::Gray($img) => Canvas::Gray($body),
            Canvas::GrayAlpha($img) => Canvas::GrayAlpha($body),
            Canvas::Rgb($img) => Canvas::Rgb($body),
            Canvas::Rgba($img) => Canvas::Rgba($body),
        }
    };
}

/// Run the same expression against whichever buffer the canvas holds.
macro_rules! with_canvas {
    ($canvas:expr, |$img:ident| $body:expr) => {
        match $canvas {
            Canvas::Gray($img) => $body,
            Canvas::GrayAlpha($img) => $body,
            Canvas::Rgb($img) => $body,
            Canvas::Rgba($img) => $body,
        }
    };
}

pub(crate) use map_canvas;
pub(crate) use with_canvas;

impl Canvas {
    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        with_canvas!(self, |img| img.width())
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        with_canvas!(self, |img| img.height())
    }

    /// Total channels per pixel, alpha included.
    pub fn channels(&self) -> usize {
        match self {
            Canvas::Gray(_) => 1,
            Canvas::GrayAlpha(_) => 2,
            Canvas::Rgb(_) => 3,
            Canvas::Rgba(_) => 4,
        }
    }

    /// Whether the last channel of each pixel is alpha.
    pub fn has_alpha(&self) -> bool {
        matches!(self, Canvas::GrayAlpha(_) | Canvas::Rgba(_))
    }

    /// Raw interleaved subpixels.
    pub fn as_raw(&self) -> &[u8] {
        with_canvas!(self, |img| img.as_raw().as_slice())
    }

    /// Mutable raw interleaved subpixels.
    pub(crate) fn raw_mut(&mut self) -> &mut [u8] {
        with_canvas!(self, |img| &mut **img)
    }

    /// Apply `f` to every color subpixel, leaving alpha untouched.
    pub(crate) fn map_color_subpixels(&mut self, mut f: impl FnMut(u8) -> u8) {
        let channels = self.channels();
        let color = if self.has_alpha() { channels - 1 } else { channels };
        for pixel in self.raw_mut().chunks_exact_mut(channels) {
            for value in &mut pixel[..color] {
                *value = f(*value);
            }
        }
    }

    /// Copy of the alpha plane, if the canvas has one.
    pub(crate) fn alpha_plane(&self) -> Option<Vec<u8>> {
        if !self.has_alpha() {
            return None;
        }
        let channels = self.channels();
        Some(
            self.as_raw()
                .chunks_exact(channels)
                .map(|px| px[channels - 1])
                .collect(),
        )
    }

    /// Overwrite the alpha plane with a previously captured copy.
    pub(crate) fn restore_alpha(&mut self, alpha: &[u8]) {
        let channels = self.channels();
        for (pixel, &a) in self.raw_mut().chunks_exact_mut(channels).zip(alpha) {
            pixel[channels - 1] = a;
        }
    }

    /// Convert into a `DynamicImage` suitable for the given output format.
    ///
    /// JPEG cannot carry alpha, so the alpha channel is dropped for it.
    pub fn into_dynamic_for(self, format: ImageFormat) -> DynamicImage {
        let image = DynamicImage::from(self);
        match (format, image.color().has_alpha()) {
            (ImageFormat::Jpeg, true) if image.color().has_color() => {
                DynamicImage::ImageRgb8(image.to_rgb8())
            }
            (ImageFormat::Jpeg, true) => DynamicImage::ImageLuma8(image.to_luma8()),
            _ => image,
        }
    }
}

impl From<DynamicImage> for Canvas {
    fn from(image: DynamicImage) -> Self {
        match image {
            DynamicImage::ImageLuma8(img) => Canvas::Gray(img),
            DynamicImage::ImageLumaA8(img) => Canvas::GrayAlpha(img),
            DynamicImage::ImageRgb8(img) => Canvas::Rgb(img),
            DynamicImage::ImageRgba8(img) => Canvas::Rgba(img),
            other => {
                let color = other.color();
                match (color.has_color(), color.has_alpha()) {
                    (false, false) => Canvas::Gray(other.to_luma8()),
                    (false, true) => Canvas::GrayAlpha(other.to_luma_alpha8()),
                    (true, false) => Canvas::Rgb(other.to_rgb8()),
                    (true, true) => Canvas::Rgba(other.to_rgba8()),
                }
            }
        }
    }
}

impl From<Canvas> for DynamicImage {
    fn from(canvas: Canvas) -> Self {
        match canvas {
            Canvas::Gray(img) => DynamicImage::ImageLuma8(img),
            Canvas::GrayAlpha(img) => DynamicImage::ImageLumaA8(img),
            Canvas::Rgb(img) => DynamicImage::ImageRgb8(img),
            Canvas::Rgba(img) => DynamicImage::ImageRgba8(img),
        }
    }
}

/// An all-zero pixel: black, and fully transparent when the layout has alpha.
pub(crate) fn blank_pixel<P: Pixel<Subpixel = u8>>() -> P {
    let zeros = [0u8; 4];
    *P::from_slice(&zeros[..usize::from(P::CHANNEL_COUNT)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma, LumaA, Rgb, Rgba};

    #[test]
    fn test_native_layouts_are_kept() {
        let gray = Canvas::from(DynamicImage::new_luma8(4, 3));
        assert_eq!(gray.channels(), 1);
        let gray_alpha = Canvas::from(DynamicImage::new_luma_a8(4, 3));
        assert_eq!(gray_alpha.channels(), 2);
        let rgb = Canvas::from(DynamicImage::new_rgb8(4, 3));
        assert_eq!(rgb.channels(), 3);
        let rgba = Canvas::from(DynamicImage::new_rgba8(4, 3));
        assert_eq!(rgba.channels(), 4);
        assert_eq!((rgba.width(), rgba.height()), (4, 3));
    }

    #[test]
    fn test_sixteen_bit_is_narrowed_with_same_channels() {
        let canvas = Canvas::from(DynamicImage::new_rgba16(2, 2));
        assert!(matches!(canvas, Canvas::Rgba(_)));
        let canvas = Canvas::from(DynamicImage::new_luma16(2, 2));
        assert!(matches!(canvas, Canvas::Gray(_)));
    }

    #[test]
    fn test_color_map_skips_alpha() {
        let img: RgbaImage = ImageBuffer::from_pixel(2, 2, Rgba([10, 20, 30, 40]));
        let mut canvas = Canvas::Rgba(img);
        canvas.map_color_subpixels(|v| v.saturating_add(100));
        assert_eq!(&canvas.as_raw()[..4], &[110, 120, 130, 40]);
    }

    #[test]
    fn test_alpha_plane_round_trip() {
        let img: GrayAlphaImage = ImageBuffer::from_pixel(3, 1, LumaA([5, 200]));
        let mut canvas = Canvas::GrayAlpha(img);
        let alpha = canvas.alpha_plane().unwrap();
        assert_eq!(alpha, vec![200, 200, 200]);

        for v in canvas.raw_mut() {
            *v = 0;
        }
        canvas.restore_alpha(&alpha);
        assert_eq!(canvas.as_raw(), &[0, 200, 0, 200, 0, 200]);
    }

    #[test]
    fn test_no_alpha_plane_without_alpha() {
        let canvas = Canvas::Gray(ImageBuffer::from_pixel(2, 2, Luma([1])));
        assert!(canvas.alpha_plane().is_none());
    }

    #[test]
    fn test_jpeg_drops_alpha() {
        let canvas = Canvas::Rgba(ImageBuffer::from_pixel(2, 2, Rgba([1, 2, 3, 4])));
        let image = canvas.into_dynamic_for(ImageFormat::Jpeg);
        assert!(matches!(image, DynamicImage::ImageRgb8(_)));

        let canvas = Canvas::Rgb(ImageBuffer::from_pixel(2, 2, Rgb([1, 2, 3])));
        let image = canvas.into_dynamic_for(ImageFormat::Png);
        assert!(matches!(image, DynamicImage::ImageRgb8(_)));
    }

    #[test]
    fn test_blank_pixel_is_zero() {
        let p: Rgba<u8> = blank_pixel();
        assert_eq!(p, Rgba([0, 0, 0, 0]));
        let p: Luma<u8> = blank_pixel();
        assert_eq!(p, Luma([0]));
    }
}
