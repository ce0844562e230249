//! # Floyd–Steinberg Error Diffusion
//!
//! Converts an 8-bit grayscale canvas to a 1-bit [`Bitmap`] for the
//! thermal head, which can only print a dot or leave the paper blank.
//!
//! ## Algorithm
//!
//! Pixels are visited in row-major order. Each pixel is quantized against a
//! fixed threshold and the quantization error is pushed onto neighbours that
//! have not been visited yet:
//!
//! ```text
//!              ┌───────┬───────┐
//!              │   *   │ 7/16  │
//!      ┌───────┼───────┼───────┤
//!      │ 3/16  │ 5/16  │ 1/16  │
//!      └───────┴───────┴───────┘
//! ```
//!
//! - `new = 0 if old < 128 else 255`
//! - `error = old - new`
//! - each neighbour gets `error * w / 16` (integer division, truncating
//!   toward zero), then is clamped into `0..=255`
//! - neighbours outside the canvas are skipped
//!
//! Pure black and pure white have zero error, so they pass through
//! unchanged. Every pixel depends on already-updated neighbours, so the
//! sweep is strictly sequential.

use image::GrayImage;

use super::canvas::{BLACK, Bitmap, WHITE};

/// Values below this quantize to black.
pub const THRESHOLD: u8 = 128;

/// Quantize a single grayscale value.
#[inline]
pub fn quantize(value: u8) -> u8 {
    if value < THRESHOLD { BLACK } else { WHITE }
}

/// Add `error * weight / 16` to a pixel, clamped into the u8 range.
#[inline]
fn diffuse(pixel: &mut u8, error: i32, weight: i32) {
    let adjusted = *pixel as i32 + error * weight / 16;
    *pixel = adjusted.clamp(0, 255) as u8;
}

/// Dither a grayscale canvas to 1-bit using Floyd–Steinberg error diffusion.
///
/// The input is left untouched; the returned bitmap has identical
/// dimensions.
///
/// ## Example
///
/// ```
/// use ctp500::render::dither::floyd_steinberg;
/// use image::{GrayImage, Luma};
///
/// let gray = GrayImage::from_pixel(16, 16, Luma([0]));
/// let bitmap = floyd_steinberg(&gray);
/// assert_eq!(bitmap.black_count(), 16 * 16);
/// ```
pub fn floyd_steinberg(gray: &GrayImage) -> Bitmap {
    let (width, height) = gray.dimensions();
    let w = width as usize;
    let h = height as usize;
    let mut pixels = gray.as_raw().clone();

    for y in 0..h {
        for x in 0..w {
            let idx = y * w + x;
            let old = pixels[idx];
            let new = quantize(old);
            pixels[idx] = new;

            let error = old as i32 - new as i32;
            if error == 0 {
                continue;
            }

            if x + 1 < w {
                diffuse(&mut pixels[idx + 1], error, 7);
            }
            if y + 1 < h {
                let below = idx + w;
                if x > 0 {
                    diffuse(&mut pixels[below - 1], error, 3);
                }
                diffuse(&mut pixels[below], error, 5);
                if x + 1 < w {
                    diffuse(&mut pixels[below + 1], error, 1);
                }
            }
        }
    }

    Bitmap::from_quantized(width, height, pixels)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn black_fraction(bitmap: &Bitmap) -> f64 {
        bitmap.black_count() as f64 / (bitmap.width() * bitmap.height()) as f64
    }

    #[test]
    fn test_quantize_threshold() {
        assert_eq!(quantize(0), BLACK);
        assert_eq!(quantize(127), BLACK);
        assert_eq!(quantize(128), WHITE);
        assert_eq!(quantize(255), WHITE);
    }

    #[test]
    fn test_all_black_stays_black() {
        let gray = GrayImage::from_pixel(37, 23, Luma([0]));
        let bitmap = floyd_steinberg(&gray);
        assert_eq!(bitmap.width(), 37);
        assert_eq!(bitmap.height(), 23);
        assert!(bitmap.pixels().iter().all(|&p| p == BLACK));
    }

    #[test]
    fn test_all_white_stays_white() {
        let gray = GrayImage::from_pixel(40, 12, Luma([255]));
        let bitmap = floyd_steinberg(&gray);
        assert!(bitmap.pixels().iter().all(|&p| p == WHITE));
    }

    #[test]
    fn test_mid_gray_distribution() {
        let gray = GrayImage::from_pixel(64, 64, Luma([128]));
        let fraction = black_fraction(&floyd_steinberg(&gray));
        assert!(
            fraction > 0.3 && fraction < 0.7,
            "mid gray should dither to roughly half black, got {fraction}"
        );
    }

    #[test]
    fn test_gradient_darker_on_left() {
        let width = 256u32;
        let height = 32u32;
        let gray = GrayImage::from_fn(width, height, |x, _| Luma([x as u8]));
        let bitmap = floyd_steinberg(&gray);

        let band = width / 5;
        let count = |cols: std::ops::Range<u32>| {
            cols.flat_map(|x| (0..height).map(move |y| (x, y)))
                .filter(|&(x, y)| bitmap.is_black(x, y))
                .count()
        };
        let dark = count(0..band);
        let light = count(width - band..width);
        assert!(dark > light, "dark={dark} light={light}");
    }

    #[test]
    fn test_error_propagates_right() {
        // 100 quantizes to black with error +100; 7/16 of it (43) lifts the
        // right neighbour from 100 to 143, which quantizes to white.
        let gray = GrayImage::from_raw(2, 1, vec![100, 100]).unwrap();
        let bitmap = floyd_steinberg(&gray);
        assert_eq!(bitmap.pixels(), &[BLACK, WHITE]);
    }

    #[test]
    fn test_truncating_division_for_negative_error() {
        // 129 -> white, error -126. Right neighbour: -126 * 7 / 16 = -55
        // (truncated toward zero), 183 - 55 = 128 -> white. Flooring would
        // give -56 and a black pixel.
        let gray = GrayImage::from_raw(2, 1, vec![129, 183]).unwrap();
        let bitmap = floyd_steinberg(&gray);
        assert_eq!(bitmap.pixels(), &[WHITE, WHITE]);
    }

    #[test]
    fn test_error_reaches_row_below() {
        // Error +120 from (0,0): below gets 120 * 5 / 16 = 37, so 100 -> 137.
        let gray = GrayImage::from_raw(1, 2, vec![120, 100]).unwrap();
        let bitmap = floyd_steinberg(&gray);
        assert_eq!(bitmap.pixels(), &[BLACK, WHITE]);
    }

    #[test]
    fn test_input_not_mutated() {
        let gray = GrayImage::from_pixel(8, 8, Luma([90]));
        let before = gray.clone();
        let _ = floyd_steinberg(&gray);
        assert_eq!(gray, before);
    }

    #[test]
    fn test_deterministic() {
        let gray = GrayImage::from_fn(50, 50, |x, y| Luma([((x * 7 + y * 13) % 256) as u8]));
        assert_eq!(floyd_steinberg(&gray), floyd_steinberg(&gray));
    }

    #[test]
    fn test_single_column_and_row() {
        let col = GrayImage::from_pixel(1, 10, Luma([200]));
        assert_eq!(floyd_steinberg(&col).height(), 10);
        let row = GrayImage::from_pixel(10, 1, Luma([50]));
        assert_eq!(floyd_steinberg(&row).width(), 10);
    }

    #[test]
    fn test_empty_canvas() {
        let gray = GrayImage::new(0, 0);
        let bitmap = floyd_steinberg(&gray);
        assert_eq!(bitmap.pixels().len(), 0);
    }
}
