//! # Font Resources
//!
//! The text layout engine only needs two things from a font: the pixel
//! width of a string, and a way to draw a string onto a canvas. The
//! [`TextFont`] trait captures exactly that.
//!
//! Two implementations:
//!
//! - [`TtfFont`]: a TrueType/OpenType file rasterized with ab_glyph,
//!   anti-aliased (edges are gray and get dithered later).
//! - [`BuiltinFont`]: the Spleen bitmap font compiled into the binary.
//!   Always available, pure black on white.
//!
//! A font file that cannot be read or parsed is not fatal: [`load_font`]
//! falls back to the built-in font and reports a warning.

use std::path::Path;

use ab_glyph::{Font, FontVec, GlyphId, PxScale, ScaleFont, point};
use image::GrayImage;
use spleen_font::{FONT_6X12, FONT_8X16, FONT_12X24, PSF2Font};

use crate::error::Ctp500Error;

/// Measuring and drawing text at a fixed size.
pub trait TextFont {
    /// Advance width of `text` in pixels.
    fn measure(&self, text: &str) -> f32;

    /// Height of one line of text in pixels (without extra spacing).
    fn line_height(&self) -> u32;

    /// Draw `text` in black with its top-left corner at `(x, y)`.
    ///
    /// Pixels falling outside the canvas are clipped.
    fn draw(&self, canvas: &mut GrayImage, x: i32, y: i32, text: &str);
}

/// Darken a canvas pixel by `ink` (0 = none, 255 = solid black).
#[inline]
fn darken(canvas: &mut GrayImage, x: i32, y: i32, ink: u8) {
    if x < 0 || y < 0 || x >= canvas.width() as i32 || y >= canvas.height() as i32 {
        return;
    }
    let pixel = canvas.get_pixel_mut(x as u32, y as u32);
    pixel[0] = pixel[0].min(255 - ink);
}

// ============================================================================
// TRUETYPE
// ============================================================================

/// A TrueType/OpenType font loaded from disk.
pub struct TtfFont {
    font: FontVec,
    scale: PxScale,
}

impl TtfFont {
    /// Load a font file at `size` pixels per em.
    pub fn open<P: AsRef<Path>>(path: P, size: f32) -> Result<Self, Ctp500Error> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|e| Ctp500Error::Font(format!("could not read {}: {}", path.display(), e)))?;
        Self::from_bytes(data, size)
            .map_err(|e| Ctp500Error::Font(format!("{}: {}", path.display(), e)))
    }

    /// Parse font data held in memory.
    pub fn from_bytes(data: Vec<u8>, size: f32) -> Result<Self, Ctp500Error> {
        let font = FontVec::try_from_vec(data).map_err(|e| Ctp500Error::Font(e.to_string()))?;
        let scale = font.pt_to_px_scale(size).unwrap_or(PxScale::from(size));
        Ok(Self { font, scale })
    }

    /// Glyph ids paired with their x offset from the start of the string.
    fn layout(&self, text: &str) -> (Vec<(GlyphId, f32)>, f32) {
        let scaled = self.font.as_scaled(self.scale);
        let mut glyphs = Vec::with_capacity(text.len());
        let mut caret = 0.0f32;
        let mut previous: Option<GlyphId> = None;

        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            glyphs.push((id, caret));
            caret += scaled.h_advance(id);
            previous = Some(id);
        }

        (glyphs, caret)
    }
}

impl TextFont for TtfFont {
    fn measure(&self, text: &str) -> f32 {
        self.layout(text).1
    }

    fn line_height(&self) -> u32 {
        let scaled = self.font.as_scaled(self.scale);
        (scaled.ascent() - scaled.descent()).ceil().max(1.0) as u32
    }

    fn draw(&self, canvas: &mut GrayImage, x: i32, y: i32, text: &str) {
        let baseline = y as f32 + self.font.as_scaled(self.scale).ascent();
        let (glyphs, _) = self.layout(text);

        for (id, offset) in glyphs {
            let glyph = id.with_scale_and_position(self.scale, point(x as f32 + offset, baseline));
            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|px, py, coverage| {
                let ink = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
                darken(
                    canvas,
                    px as i32 + bounds.min.x as i32,
                    py as i32 + bounds.min.y as i32,
                    ink,
                );
            });
        }
    }
}

// ============================================================================
// BUILT-IN BITMAP FONT
// ============================================================================

/// The Spleen bitmap font, scaled by whole pixels.
///
/// | Requested size | Cell | Scale |
/// |----------------|------|-------|
/// | < 14 px | 6×12 | round(size / 12) |
/// | 14-19 px | 8×16 | round(size / 16) |
/// | ≥ 20 px | 12×24 | round(size / 24) |
#[derive(Debug, Clone, Copy)]
pub struct BuiltinFont {
    data: &'static [u8],
    cell_width: u32,
    cell_height: u32,
    scale: u32,
}

impl BuiltinFont {
    pub fn new(size: f32) -> Self {
        let (data, cell_width, cell_height): (&'static [u8], u32, u32) = if size < 14.0 {
            (FONT_6X12, 6, 12)
        } else if size < 20.0 {
            (FONT_8X16, 8, 16)
        } else {
            (FONT_12X24, 12, 24)
        };
        let scale = (size / cell_height as f32).round().max(1.0) as u32;
        Self {
            data,
            cell_width,
            cell_height,
            scale,
        }
    }

    /// Width of one character cell in pixels.
    #[inline]
    pub fn advance(&self) -> u32 {
        self.cell_width * self.scale
    }

    /// Fill one scaled font pixel.
    fn dot(&self, canvas: &mut GrayImage, x: i32, y: i32) {
        let s = self.scale as i32;
        for dy in 0..s {
            for dx in 0..s {
                darken(canvas, x + dx, y + dy, 255);
            }
        }
    }

    /// Outline box for characters the font does not cover.
    fn draw_box(&self, canvas: &mut GrayImage, x: i32, y: i32) {
        let w = self.cell_width as i32;
        let h = self.cell_height as i32;
        let s = self.scale as i32;
        for col in 1..w - 1 {
            self.dot(canvas, x + col * s, y + 2 * s);
            self.dot(canvas, x + col * s, y + (h - 3) * s);
        }
        for row in 2..h - 2 {
            self.dot(canvas, x + s, y + row * s);
            self.dot(canvas, x + (w - 2) * s, y + row * s);
        }
    }
}

impl TextFont for BuiltinFont {
    fn measure(&self, text: &str) -> f32 {
        (text.chars().count() as u32 * self.advance()) as f32
    }

    fn line_height(&self) -> u32 {
        self.cell_height * self.scale
    }

    fn draw(&self, canvas: &mut GrayImage, x: i32, y: i32, text: &str) {
        let mut spleen = match PSF2Font::new(self.data) {
            Ok(font) => font,
            Err(_) => {
                log::error!("Built-in font data is corrupt; nothing drawn");
                return;
            }
        };

        let s = self.scale as i32;
        let mut buf = [0u8; 4];
        for (i, ch) in text.chars().enumerate() {
            let cell_x = x + i as i32 * self.advance() as i32;
            if ch == ' ' {
                continue;
            }
            match spleen.glyph_for_utf8(ch.encode_utf8(&mut buf).as_bytes()) {
                Some(glyph) => {
                    for (row_y, row) in glyph.enumerate() {
                        for (col_x, on) in row.enumerate() {
                            if on {
                                self.dot(canvas, cell_x + col_x as i32 * s, y + row_y as i32 * s);
                            }
                        }
                    }
                }
                None => self.draw_box(canvas, cell_x, y),
            }
        }
    }
}

// ============================================================================
// LOADING
// ============================================================================

/// A font ready for a render pass, plus any fallback warning.
pub struct LoadedFont {
    pub font: Box<dyn TextFont>,
    /// Set when the requested font could not be used.
    pub warning: Option<String>,
}

/// Load the configured font, falling back to the built-in font.
///
/// `None` selects the built-in font without a warning.
pub fn load_font(path: Option<&Path>, size: f32) -> LoadedFont {
    let Some(path) = path else {
        return LoadedFont {
            font: Box::new(BuiltinFont::new(size)),
            warning: None,
        };
    };

    match TtfFont::open(path, size) {
        Ok(font) => LoadedFont {
            font: Box::new(font),
            warning: None,
        },
        Err(e) => {
            let warning = format!(
                "could not load font '{}': {}. Falling back to built-in font.",
                path.display(),
                e
            );
            log::warn!("{}", warning);
            LoadedFont {
                font: Box::new(BuiltinFont::new(size)),
                warning: Some(warning),
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn blank(width: u32, height: u32) -> GrayImage {
        GrayImage::from_pixel(width, height, Luma([255]))
    }

    #[test]
    fn test_builtin_size_selection() {
        let small = BuiltinFont::new(12.0);
        assert_eq!(small.advance(), 6);
        assert_eq!(small.line_height(), 12);

        let medium = BuiltinFont::new(16.0);
        assert_eq!(medium.advance(), 8);
        assert_eq!(medium.line_height(), 16);

        let default = BuiltinFont::new(28.0);
        assert_eq!(default.advance(), 12);
        assert_eq!(default.line_height(), 24);

        let large = BuiltinFont::new(48.0);
        assert_eq!(large.advance(), 24);
        assert_eq!(large.line_height(), 48);
    }

    #[test]
    fn test_builtin_measure_monospace() {
        let font = BuiltinFont::new(28.0);
        assert_eq!(font.measure(""), 0.0);
        assert_eq!(font.measure("Hello"), 60.0);
        assert_eq!(font.measure("Hello World"), 132.0);
        assert_eq!(font.measure("héllo"), 60.0);
    }

    #[test]
    fn test_builtin_draw_is_pure_black_and_white() {
        let font = BuiltinFont::new(28.0);
        let mut canvas = blank(200, 30);
        font.draw(&mut canvas, 0, 0, "Hello");
        assert!(canvas.pixels().any(|p| p[0] == 0));
        assert!(canvas.pixels().all(|p| p[0] == 0 || p[0] == 255));
    }

    #[test]
    fn test_builtin_every_cell_size_draws() {
        for size in [12.0, 16.0, 24.0] {
            let font = BuiltinFont::new(size);
            let mut canvas = blank(font.advance() * 2, font.line_height());
            font.draw(&mut canvas, 0, 0, "Ab");
            assert!(canvas.pixels().any(|p| p[0] == 0), "size {} drew nothing", size);
        }
    }

    #[test]
    fn test_builtin_draw_clips() {
        let font = BuiltinFont::new(28.0);
        let mut canvas = blank(10, 10);
        font.draw(&mut canvas, -5, -5, "WWWW");
        font.draw(&mut canvas, 8, 8, "WWWW");
    }

    #[test]
    fn test_builtin_space_draws_nothing() {
        let font = BuiltinFont::new(28.0);
        let mut canvas = blank(40, 30);
        font.draw(&mut canvas, 0, 0, "   ");
        assert!(canvas.pixels().all(|p| p[0] == 255));
    }

    #[test]
    fn test_load_font_none_is_builtin() {
        let loaded = load_font(None, 28.0);
        assert!(loaded.warning.is_none());
        assert_eq!(loaded.font.line_height(), 24);
    }

    #[test]
    fn test_load_font_missing_falls_back() {
        let loaded = load_font(Some(Path::new("/nonexistent/Lucon.ttf")), 28.0);
        let warning = loaded.warning.expect("fallback should warn");
        assert!(warning.contains("Lucon.ttf"));
        assert_eq!(loaded.font.measure("ab"), 24.0);
    }

    #[test]
    fn test_load_font_garbage_falls_back() {
        let path = std::env::temp_dir().join("ctp500-not-a-font.ttf");
        std::fs::write(&path, b"definitely not a font").unwrap();
        let loaded = load_font(Some(&path), 28.0);
        assert!(loaded.warning.is_some());
        let _ = std::fs::remove_file(&path);
    }

    const DEJAVU_MONO: &str = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/DejaVuSansMono.ttf"
    );

    #[test]
    fn test_ttf_measure() {
        let font = TtfFont::open(DEJAVU_MONO, 28.0).unwrap();
        assert_eq!(font.measure(""), 0.0);

        let one = font.measure("W");
        assert!(one > 0.0);
        assert!((font.measure("WWWW") - 4.0 * one).abs() < 0.01);
        // Monospaced: narrow and wide glyphs share an advance
        assert!((font.measure("iii") - font.measure("WWW")).abs() < 0.01);
    }

    #[test]
    fn test_ttf_line_height_tracks_size() {
        let small = TtfFont::open(DEJAVU_MONO, 14.0).unwrap();
        let large = TtfFont::open(DEJAVU_MONO, 28.0).unwrap();
        assert!(small.line_height() > 0);
        assert!(large.line_height() > small.line_height());
        assert!(large.line_height() >= 28);
    }

    #[test]
    fn test_ttf_draw_inks_inside_text_box() {
        let font = TtfFont::open(DEJAVU_MONO, 28.0).unwrap();
        let width = font.measure("Hello").ceil() as u32;
        let mut canvas = blank(width + 40, font.line_height() + 40);
        font.draw(&mut canvas, 20, 20, "Hello");

        let inked: Vec<(u32, u32)> = canvas
            .enumerate_pixels()
            .filter(|(_, _, p)| p[0] < 128)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!inked.is_empty());
        for (x, y) in inked {
            assert!(x >= 19 && x <= 21 + width, "ink at x={}", x);
            assert!(y >= 19 && y <= 21 + font.line_height(), "ink at y={}", y);
        }
    }

    #[test]
    fn test_ttf_wraps_by_measured_width() {
        let font = TtfFont::open(DEJAVU_MONO, 28.0).unwrap();
        let text = "The quick brown fox jumps over the lazy dog again and again";
        let lines = crate::render::text::wrap_line(text, &font, 384);

        assert!(lines.len() > 1);
        assert_eq!(lines.join(" "), text);
        for line in &lines {
            assert!(font.measure(line) <= 384.0, "{:?} overflows", line);
        }
    }

    #[test]
    fn test_load_font_file_without_warning() {
        let loaded = load_font(Some(Path::new(DEJAVU_MONO)), 28.0);
        assert!(loaded.warning.is_none());
        let builtin = BuiltinFont::new(28.0);
        assert_ne!(loaded.font.measure("Hello"), builtin.measure("Hello"));
    }

    #[test]
    fn test_ttf_from_bytes_rejects_garbage() {
        let err = TtfFont::from_bytes(vec![0, 1, 2, 3], 28.0).err().unwrap();
        assert!(matches!(err, Ctp500Error::Font(_)));
    }
}
