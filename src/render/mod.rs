//! # Rendering Module
//!
//! Everything between "some text or an image" and a 1-bit bitmap the
//! raster encoder can pack.
//!
//! ## Modules
//!
//! - [`text`]: greedy word wrap and drawing onto an oversized canvas
//! - [`font`]: TrueType fonts via ab_glyph, with a built-in Spleen fallback
//! - [`trim`]: crop a canvas to its content plus a bottom margin
//! - [`normalize`]: grayscale, scale down and pad to the printer width
//! - [`dither`]: Floyd–Steinberg error diffusion to 1-bit
//! - [`canvas`]: the [`Bitmap`](canvas::Bitmap) type shared by the stages
//!
//! ## Usage Example
//!
//! ```
//! use ctp500::render::{dither, normalize};
//! use image::{DynamicImage, GrayImage, Luma};
//!
//! let photo = DynamicImage::ImageLuma8(GrayImage::from_pixel(800, 400, Luma([90])));
//! let gray = normalize::normalize(&photo, 384);
//! let bitmap = dither::floyd_steinberg(&gray);
//! assert_eq!((bitmap.width(), bitmap.height()), (384, 192));
//! ```

pub mod canvas;
pub mod dither;
pub mod font;
pub mod normalize;
pub mod text;
pub mod trim;
