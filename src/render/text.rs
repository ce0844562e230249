//! # Text Layout Engine
//!
//! Greedy word wrap against a pixel width, then left-aligned drawing onto
//! an oversized white canvas. The canvas is cropped afterwards by
//! [`super::trim`].
//!
//! Hard line breaks always start a new line. Within a hard line, words are
//! appended while `measure(line + " " + word) <= width`. A word that is
//! wider than the whole line is placed alone and left to overflow; it is
//! never split or dropped.

use image::{GrayImage, Luma};

use super::font::TextFont;
use super::trim::BACKGROUND;
use crate::printer::TextConfig;

/// Wrap one hard line into output lines no wider than `max_width`.
///
/// An empty (or whitespace-only) line yields a single empty output line.
pub fn wrap_line(line: &str, font: &dyn TextFont, max_width: u32) -> Vec<String> {
    let mut words = line.split_whitespace();
    let Some(first) = words.next() else {
        return vec![String::new()];
    };

    let mut lines = Vec::new();
    let mut current = first.to_string();

    for word in words {
        let candidate = format!("{} {}", current, word);
        if font.measure(&candidate) <= max_width as f32 {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    lines.push(current);
    lines
}

/// Wrap a whole text buffer, honouring hard line breaks.
pub fn wrap_text(text: &str, font: &dyn TextFont, max_width: u32) -> Vec<String> {
    text.lines()
        .flat_map(|line| wrap_line(line, font, max_width))
        .collect()
}

/// Render `text` onto a `width`-wide canvas.
///
/// The canvas is at least `config.canvas_height` rows tall and grows when
/// the wrapped text needs more. Content starts at the top-left corner.
pub fn render_text(text: &str, font: &dyn TextFont, width: u32, config: &TextConfig) -> GrayImage {
    let lines = wrap_text(text, font, width);
    let pitch = font.line_height() + config.line_spacing;
    let needed = (lines.len() as u32 + 1).saturating_mul(pitch);
    let height = config.canvas_height.max(needed);

    log::debug!(
        "Laid out {} line(s) at {} px pitch on {}x{} canvas",
        lines.len(),
        pitch,
        width,
        height
    );

    let mut canvas = GrayImage::from_pixel(width, height, Luma([BACKGROUND]));
    for (i, line) in lines.iter().enumerate() {
        if !line.is_empty() {
            font.draw(&mut canvas, 0, (i as u32 * pitch) as i32, line);
        }
    }
    canvas
}

// ============================================================================
// TESTS
// ============================================================================
