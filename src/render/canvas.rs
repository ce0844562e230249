//! # 1-bit Canvas
//!
//! Grayscale canvases are plain [`image::GrayImage`] buffers. Once a canvas
//! has been dithered it becomes a [`Bitmap`]: one byte per pixel, where
//! 0 is black and 255 is white. Packing into device bits happens later in
//! [`crate::protocol::graphics`].

use std::path::Path;

use image::{GrayImage, Luma};

use crate::error::Ctp500Error;

/// Black pixel value in a [`Bitmap`].
pub const BLACK: u8 = 0;

/// White pixel value in a [`Bitmap`].
pub const WHITE: u8 = 255;

/// Smallest rectangle holding every non-background pixel.
///
/// `right` and `bottom` are exclusive, so `right - left` is the width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl BoundingBox {
    #[inline]
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

/// A monochrome canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Bitmap {
    /// All-white bitmap.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![WHITE; width as usize * height as usize],
        }
    }

    /// Build a bitmap from row-major pixel values.
    ///
    /// Zero is black; any other value is treated as white and stored as 255.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, Ctp500Error> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(Ctp500Error::InvalidDimension(format!(
                "{}x{} bitmap needs {} pixels, got {}",
                width,
                height,
                expected,
                pixels.len()
            )));
        }
        let pixels = pixels
            .into_iter()
            .map(|p| if p == BLACK { BLACK } else { WHITE })
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Wrap pixels that are already 0 or 255 and match the dimensions.
    pub(crate) fn from_quantized(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major pixel values (0 or 255).
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// One row of pixel values.
    pub fn row(&self, y: u32) -> &[u8] {
        let w = self.width as usize;
        let start = y as usize * w;
        &self.pixels[start..start + w]
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    #[inline]
    pub fn is_black(&self, x: u32, y: u32) -> bool {
        self.get(x, y) == BLACK
    }

    pub fn set_black(&mut self, x: u32, y: u32, black: bool) {
        let idx = y as usize * self.width as usize + x as usize;
        self.pixels[idx] = if black { BLACK } else { WHITE };
    }

    /// Number of black pixels.
    pub fn black_count(&self) -> usize {
        self.pixels.iter().filter(|&&p| p == BLACK).count()
    }

    /// Grayscale view of the bitmap, for previews.
    pub fn to_gray_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| Luma([self.get(x, y)]))
    }

    /// Save the bitmap as a PNG preview of exactly what will be printed.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), Ctp500Error> {
        let path = path.as_ref();
        self.to_gray_image()
            .save(path)
            .map_err(|e| Ctp500Error::Image(format!("Failed to save {}: {}", path.display(), e)))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_white() {
        let bmp = Bitmap::new(16, 4);
        assert_eq!(bmp.pixels().len(), 64);
        assert_eq!(bmp.black_count(), 0);
    }

    #[test]
    fn test_from_pixels_normalizes() {
        let bmp = Bitmap::from_pixels(4, 1, vec![0, 1, 128, 255]).unwrap();
        assert_eq!(bmp.pixels(), &[0, 255, 255, 255]);
    }

    #[test]
    fn test_from_pixels_length_mismatch() {
        let err = Bitmap::from_pixels(8, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, Ctp500Error::InvalidDimension(_)));
    }

    #[test]
    fn test_set_and_get() {
        let mut bmp = Bitmap::new(8, 2);
        bmp.set_black(3, 1, true);
        assert!(bmp.is_black(3, 1));
        assert!(!bmp.is_black(3, 0));
        assert_eq!(bmp.row(1)[3], BLACK);
        bmp.set_black(3, 1, false);
        assert_eq!(bmp.black_count(), 0);
    }

    #[test]
    fn test_to_gray_image() {
        let mut bmp = Bitmap::new(2, 2);
        bmp.set_black(1, 0, true);
        let img = bmp.to_gray_image();
        assert_eq!(img.get_pixel(1, 0)[0], 0);
        assert_eq!(img.get_pixel(0, 0)[0], 255);
    }

    #[test]
    fn test_bounding_box_size() {
        let bbox = BoundingBox {
            left: 2,
            top: 3,
            right: 10,
            bottom: 7,
        };
        assert_eq!(bbox.width(), 8);
        assert_eq!(bbox.height(), 4);
    }
}
