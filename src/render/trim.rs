//! # Canvas Trimmer
//!
//! Text is drawn onto an oversized white canvas. Trimming crops it to the
//! drawn content and keeps a few blank rows underneath so the last line is
//! not flush with the paper cut.
//!
//! ```text
//! ┌──────────────────────┐        ┌──────────────┐
//! │Hello World           │        │Hello World   │
//! │                      │   →    │              │ ← margin rows
//! │                      │        └──────────────┘
//! │         ...          │
//! └──────────────────────┘
//! ```
//!
//! A canvas with no content is returned as-is.

use image::{GrayImage, imageops};

use super::canvas::BoundingBox;

/// Background value the canvas is compared against.
pub const BACKGROUND: u8 = 255;

/// Bounding box of pixels that differ from white by more than `threshold`.
///
/// Returns `None` for a canvas that is entirely background.
pub fn content_bounds(canvas: &GrayImage, threshold: u8) -> Option<BoundingBox> {
    let (width, height) = canvas.dimensions();

    let mut left = width;
    let mut top = height;
    let mut right = 0u32;
    let mut bottom = 0u32;

    for (x, y, pixel) in canvas.enumerate_pixels() {
        if BACKGROUND - pixel[0] > threshold {
            left = left.min(x);
            top = top.min(y);
            right = right.max(x + 1);
            bottom = bottom.max(y + 1);
        }
    }

    if right == 0 {
        None
    } else {
        Some(BoundingBox {
            left,
            top,
            right,
            bottom,
        })
    }
}

/// Crop a canvas to its content, extending `margin` rows below it.
///
/// The bottom edge is clamped to the canvas height, so the result is never
/// larger than the input.
pub fn trim(canvas: GrayImage, margin: u32) -> GrayImage {
    let Some(bbox) = content_bounds(&canvas, 0) else {
        log::debug!(
            "Nothing to trim on {}x{} canvas",
            canvas.width(),
            canvas.height()
        );
        return canvas;
    };

    let bottom = bbox.bottom.saturating_add(margin).min(canvas.height());
    log::debug!(
        "Trimming {}x{} canvas to ({}, {})..({}, {})",
        canvas.width(),
        canvas.height(),
        bbox.left,
        bbox.top,
        bbox.right,
        bottom
    );

    imageops::crop_imm(
        &canvas,
        bbox.left,
        bbox.top,
        bbox.width(),
        bottom - bbox.top,
    )
    .to_image()
}

// ============================================================================
// TESTS
// ============================================================================
