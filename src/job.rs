//! # Print Jobs
//!
//! Glue between the rendering stages and the raster encoder.
//!
//! ```text
//! text  ─► layout ─► trim ─┐
//!                          ├─► normalize ─► dither ─► raster
//! image ───────────────────┘
//! ```
//!
//! Everything here is synchronous and CPU-bound. The resulting
//! [`RasterJob::data`] is handed to a
//! [`ChunkedTransport`](crate::transport::ChunkedTransport) for delivery.

use std::path::Path;

use image::{DynamicImage, GrayImage};

use crate::error::Ctp500Error;
use crate::printer::Config;
use crate::protocol::graphics;
use crate::render::canvas::Bitmap;
use crate::render::{dither, font, normalize, text, trim};

/// A rendered and trimmed text canvas.
#[derive(Debug, Clone)]
pub struct TextRender {
    pub canvas: GrayImage,
    /// Set when the configured font could not be loaded.
    pub font_warning: Option<String>,
}

/// A fully encoded raster job.
#[derive(Debug, Clone)]
pub struct RasterJob {
    /// The 1-bit image that `data` encodes.
    pub bitmap: Bitmap,
    /// Raster command buffer: header followed by packed rows.
    pub data: Vec<u8>,
    /// Non-fatal problems encountered while rendering.
    pub warnings: Vec<String>,
}

impl RasterJob {
    fn encode(bitmap: Bitmap, config: &Config, warnings: Vec<String>) -> Result<Self, Ctp500Error> {
        let data = graphics::raster(&bitmap, config.printer.polarity)?;
        log::info!(
            "Raster {}x{} ({:.1} mm), {} bytes",
            bitmap.width(),
            bitmap.height(),
            config.printer.dots_to_mm(bitmap.height()),
            data.len()
        );
        Ok(Self {
            bitmap,
            data,
            warnings,
        })
    }
}

/// Lay out `text` at the printer width and trim it to its content.
pub fn render_text(text: &str, config: &Config) -> TextRender {
    let loaded = font::load_font(config.text.font_path.as_deref(), config.text.font_size);
    let canvas = text::render_text(
        text,
        loaded.font.as_ref(),
        config.printer.width_dots,
        &config.text,
    );
    TextRender {
        canvas: trim::trim(canvas, config.text.trim_margin),
        font_warning: loaded.warning,
    }
}

/// Decode an image file.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage, Ctp500Error> {
    let path = path.as_ref();
    image::open(path)
        .map_err(|e| Ctp500Error::Image(format!("Failed to load {}: {}", path.display(), e)))
}

/// Normalize and dither an image to a printable bitmap.
pub fn prepare_image(image: &DynamicImage, width: u32) -> Bitmap {
    dither::floyd_steinberg(&normalize::normalize(image, width))
}

/// Render, dither and encode text.
pub fn text_job(text: &str, config: &Config) -> Result<RasterJob, Ctp500Error> {
    config.validate()?;

    let rendered = render_text(text, config);
    let gray = normalize::normalize_gray(rendered.canvas, config.printer.width_dots);
    let bitmap = dither::floyd_steinberg(&gray);

    RasterJob::encode(bitmap, config, rendered.font_warning.into_iter().collect())
}

/// Normalize, dither and encode an image.
pub fn image_job(image: &DynamicImage, config: &Config) -> Result<RasterJob, Ctp500Error> {
    config.validate()?;
    let bitmap = prepare_image(image, config.printer.width_dots);
    RasterJob::encode(bitmap, config, Vec::new())
}

// ============================================================================
// TESTS
// ============================================================================
