//! # Image Normalizer
//!
//! Brings an arbitrary decoded image to the printer's raster width as an
//! 8-bit grayscale canvas ready for dithering.
//!
//! ## Steps
//!
//! 1. Convert to grayscale. Transparent pixels are composited onto white
//!    paper first, so they do not print as black.
//! 2. If wider than the target, scale down with Lanczos3, keeping the aspect
//!    ratio: `height = round(src_height × target / src_width)`.
//! 3. If narrower than the target, pad on the right with white. Images are
//!    never scaled up.
//! 4. If the width is still not a multiple of 8, pad to the next multiple.

use image::{DynamicImage, GrayImage, Luma, imageops, imageops::FilterType};

use super::trim::BACKGROUND;

/// Grayscale conversion with alpha composited onto white.
pub fn to_grayscale(image: &DynamicImage) -> GrayImage {
    if !image.color().has_alpha() {
        return image.to_luma8();
    }

    let la = image.to_luma_alpha8();
    GrayImage::from_fn(la.width(), la.height(), |x, y| {
        let [l, a] = la.get_pixel(x, y).0;
        let (l, a) = (l as u32, a as u32);
        let value = (l * a + BACKGROUND as u32 * (255 - a) + 127) / 255;
        Luma([value as u8])
    })
}

/// Height after scaling `src_width × src_height` down to `target_width`.
///
/// Never returns zero for an image with rows; a zero-height image stays empty.
pub fn scaled_height(src_width: u32, src_height: u32, target_width: u32) -> u32 {
    if src_height == 0 {
        return 0;
    }
    let h = (src_height as f64 * target_width as f64 / src_width as f64).round() as u32;
    h.max(1)
}

/// Pad a canvas on the right with white up to `width`.
fn pad_right(canvas: GrayImage, width: u32) -> GrayImage {
    if canvas.width() >= width {
        return canvas;
    }
    let mut padded = GrayImage::from_pixel(width, canvas.height(), Luma([BACKGROUND]));
    imageops::replace(&mut padded, &canvas, 0, 0);
    padded
}

/// Normalize a grayscale canvas to `target_width`.
///
/// The result width is `target_width` rounded up to a multiple of 8.
pub fn normalize_gray(canvas: GrayImage, target_width: u32) -> GrayImage {
    let (src_width, src_height) = canvas.dimensions();
    if src_height == 0 {
        return GrayImage::new(target_width.next_multiple_of(8), 0);
    }

    let canvas = if src_width > target_width {
        let height = scaled_height(src_width, src_height, target_width);
        log::debug!(
            "Scaling {}x{} down to {}x{}",
            src_width,
            src_height,
            target_width,
            height
        );
        imageops::resize(&canvas, target_width, height, FilterType::Lanczos3)
    } else {
        canvas
    };

    let canvas = pad_right(canvas, target_width);

    let aligned = canvas.width().next_multiple_of(8);
    if aligned != canvas.width() {
        log::warn!(
            "Raster width {} is not a multiple of 8, padding to {}",
            canvas.width(),
            aligned
        );
    }
    pad_right(canvas, aligned)
}

/// Normalize any decoded image to `target_width`.
///
/// ```
/// use ctp500::render::normalize::normalize;
/// use image::{DynamicImage, GrayImage};
///
/// let image = DynamicImage::ImageLuma8(GrayImage::new(800, 400));
/// let canvas = normalize(&image, 384);
/// assert_eq!(canvas.dimensions(), (384, 192));
/// ```
pub fn normalize(image: &DynamicImage, target_width: u32) -> GrayImage {
    normalize_gray(to_grayscale(image), target_width)
}

// ============================================================================
// TESTS
// ============================================================================
