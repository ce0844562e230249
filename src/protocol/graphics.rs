//! # Raster Graphics Command (GS v 0)
//!
//! Packs a dithered [`Bitmap`] into the printer's raster command.
//!
//! ## Command Layout
//!
//! | Format  | Bytes |
//! |---------|-------|
//! | ASCII   | GS v 0 m xL xH yL yH d1...dk |
//! | Hex     | 1D 76 30 00 xL xH yL yH d1...dk |
//!
//! - `m`: Mode, always 0 (normal density)
//! - `xL, xH`: Width in bytes, little-endian
//! - `yL, yH`: Height in dots, little-endian
//! - `d1...dk`: k = width_bytes × height data bytes, row-major
//!
//! ## Bit Packing
//!
//! Each data byte holds 8 horizontal dots:
//! - Bit 7 (MSB) = leftmost dot
//! - Bit 0 (LSB) = rightmost dot
//!
//! The natural packing sets a bit for **white** and clears it for black:
//!
//! ```text
//! Pixels  █░█░█░█░  →  01010101 = 0x55
//! ```
//!
//! With [`BitPolarity::BlackIsOne`] every data byte is inverted after
//! packing. The header is never inverted.

use super::commands::{GS, u16_le};
use crate::error::Ctp500Error;
use crate::printer::BitPolarity;
use crate::render::canvas::{BLACK, Bitmap};

/// Length of the `GS v 0` header.
pub const RASTER_HEADER_LEN: usize = 8;

/// Mode byte: normal density.
const MODE_NORMAL: u8 = 0x00;

/// Pack a row of pixel values into bytes, white = 1-bit, MSB first.
///
/// The row length must be a multiple of 8; [`raster`] checks this before
/// calling.
///
/// ```
/// use ctp500::protocol::graphics::pack_row;
///
/// // black, white, black, white...
/// let row = [0, 255, 0, 255, 0, 255, 0, 255];
/// assert_eq!(pack_row(&row), vec![0x55]);
/// ```
pub fn pack_row(pixels: &[u8]) -> Vec<u8> {
    pixels
        .chunks(8)
        .map(|octet| {
            octet.iter().enumerate().fold(0u8, |byte, (i, &p)| {
                if p == BLACK { byte } else { byte | (0x80 >> i) }
            })
        })
        .collect()
}

/// # Encode a Raster Command
///
/// Returns the full command buffer: 8-byte header followed by
/// `width / 8 × height` data bytes.
///
/// ## Errors
///
/// [`Ctp500Error::InvalidDimension`] if the width is not a multiple of 8,
/// or if the width in bytes or the height does not fit in 16 bits. Padding
/// is the normalizer's job; the encoder never pads silently.
///
/// ## Example
///
/// ```
/// use ctp500::printer::BitPolarity;
/// use ctp500::protocol::graphics;
/// use ctp500::render::canvas::Bitmap;
///
/// let bitmap = Bitmap::new(384, 10);
/// let cmd = graphics::raster(&bitmap, BitPolarity::BlackIsZero).unwrap();
///
/// assert_eq!(&cmd[0..4], &[0x1D, 0x76, 0x30, 0x00]);
/// assert_eq!(&cmd[4..8], &[48, 0, 10, 0]);
/// assert_eq!(cmd.len(), 8 + 48 * 10);
/// ```
pub fn raster(bitmap: &Bitmap, polarity: BitPolarity) -> Result<Vec<u8>, Ctp500Error> {
    let width = bitmap.width();
    let height = bitmap.height();

    if width % 8 != 0 {
        return Err(Ctp500Error::InvalidDimension(format!(
            "raster width {} is not a multiple of 8",
            width
        )));
    }

    let width_bytes = u16::try_from(width / 8).map_err(|_| {
        Ctp500Error::InvalidDimension(format!("raster width {} is too large", width))
    })?;
    let height_rows = u16::try_from(height).map_err(|_| {
        Ctp500Error::InvalidDimension(format!("raster height {} is too large", height))
    })?;

    let [xl, xh] = u16_le(width_bytes);
    let [yl, yh] = u16_le(height_rows);

    let mut cmd = Vec::with_capacity(RASTER_HEADER_LEN + width_bytes as usize * height as usize);
    cmd.extend_from_slice(&[GS, b'v', b'0', MODE_NORMAL, xl, xh, yl, yh]);

    for y in 0..height {
        cmd.extend(pack_row(bitmap.row(y)));
    }

    if polarity.black_is_one() {
        for byte in &mut cmd[RASTER_HEADER_LEN..] {
            *byte ^= 0xFF;
        }
    }

    Ok(cmd)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn row_bitmap(pixels: &[u8]) -> Bitmap {
        Bitmap::from_pixels(pixels.len() as u32, 1, pixels.to_vec()).unwrap()
    }

    #[test]
    fn test_raster_header() {
        let bitmap = Bitmap::new(384, 100);
        let cmd = raster(&bitmap, BitPolarity::BlackIsZero).unwrap();

        assert_eq!(cmd[0], 0x1D); // GS
        assert_eq!(cmd[1], 0x76); // 'v'
        assert_eq!(cmd[2], 0x30); // '0'
        assert_eq!(cmd[3], 0x00); // m
        assert_eq!(cmd[4], 48); // xL (384/8 = 48)
        assert_eq!(cmd[5], 0); // xH
        assert_eq!(cmd[6], 100); // yL
        assert_eq!(cmd[7], 0); // yH
    }

    #[test]
    fn test_raster_total_length() {
        let bitmap = Bitmap::new(64, 7);
        let cmd = raster(&bitmap, BitPolarity::BlackIsZero).unwrap();
        assert_eq!(cmd.len(), 8 + 8 * 7);
    }

    #[test]
    fn test_raster_large_height() {
        // 500 = 0x01F4 -> [0xF4, 0x01] in little-endian
        let bitmap = Bitmap::new(8, 500);
        let cmd = raster(&bitmap, BitPolarity::BlackIsZero).unwrap();
        assert_eq!(cmd[6], 0xF4);
        assert_eq!(cmd[7], 0x01);
    }

    #[test]
    fn test_raster_wide_width_bytes() {
        // 2048 dots = 256 bytes -> [0x00, 0x01]
        let bitmap = Bitmap::new(2048, 1);
        let cmd = raster(&bitmap, BitPolarity::BlackIsZero).unwrap();
        assert_eq!(cmd[4], 0x00);
        assert_eq!(cmd[5], 0x01);
    }

    #[test]
    fn test_black_natural_polarity() {
        let cmd = raster(&row_bitmap(&[0; 8]), BitPolarity::BlackIsZero).unwrap();
        assert_eq!(cmd[8..], [0x00]);
    }

    #[test]
    fn test_black_inverted_polarity() {
        let cmd = raster(&row_bitmap(&[0; 8]), BitPolarity::BlackIsOne).unwrap();
        assert_eq!(cmd[8..], [0xFF]);
    }

    #[test]
    fn test_white_natural_polarity() {
        let cmd = raster(&row_bitmap(&[255; 8]), BitPolarity::BlackIsZero).unwrap();
        assert_eq!(cmd[8..], [0xFF]);
    }

    #[test]
    fn test_alternating_pattern() {
        let cmd = raster(
            &row_bitmap(&[0, 255, 0, 255, 0, 255, 0, 255]),
            BitPolarity::BlackIsZero,
        )
        .unwrap();
        assert_eq!(cmd[8..], [0x55]);

        let cmd = raster(
            &row_bitmap(&[0, 255, 0, 255, 0, 255, 0, 255]),
            BitPolarity::BlackIsOne,
        )
        .unwrap();
        assert_eq!(cmd[8..], [0xAA]);
    }

    #[test]
    fn test_inversion_leaves_header() {
        let bitmap = Bitmap::new(16, 3);
        let natural = raster(&bitmap, BitPolarity::BlackIsZero).unwrap();
        let inverted = raster(&bitmap, BitPolarity::BlackIsOne).unwrap();
        assert_eq!(natural[..8], inverted[..8]);
        assert!(natural[8..].iter().all(|&b| b == 0xFF));
        assert!(inverted[8..].iter().all(|&b| b == 0x00));
    }

    #[test]
    fn test_msb_is_leftmost() {
        let mut pixels = [255u8; 8];
        pixels[0] = 0;
        let cmd = raster(&row_bitmap(&pixels), BitPolarity::BlackIsOne).unwrap();
        assert_eq!(cmd[8..], [0x80]);
    }

    #[test]
    fn test_rows_are_row_major() {
        let mut bitmap = Bitmap::new(16, 2);
        bitmap.set_black(15, 1, true);
        let cmd = raster(&bitmap, BitPolarity::BlackIsOne).unwrap();
        assert_eq!(cmd[8..], [0x00, 0x00, 0x00, 0x01]);
    }

    #[test]
    fn test_width_not_multiple_of_8() {
        let bitmap = Bitmap::new(10, 4);
        let err = raster(&bitmap, BitPolarity::BlackIsZero).unwrap_err();
        assert!(matches!(err, Ctp500Error::InvalidDimension(_)));
    }

    #[test]
    fn test_height_too_large() {
        let bitmap = Bitmap::new(8, 70_000);
        let err = raster(&bitmap, BitPolarity::BlackIsZero).unwrap_err();
        assert!(matches!(err, Ctp500Error::InvalidDimension(_)));
    }

    #[test]
    fn test_empty_height() {
        let bitmap = Bitmap::new(8, 0);
        let cmd = raster(&bitmap, BitPolarity::BlackIsZero).unwrap();
        assert_eq!(cmd, vec![0x1D, 0x76, 0x30, 0x00, 1, 0, 0, 0]);
    }

    #[test]
    fn test_pack_row_empty() {
        assert_eq!(pack_row(&[]), Vec::<u8>::new());
    }
}
