//! # ESC/POS Protocol Implementation
//!
//! Byte-exact command builders for the CTP500 raster protocol.
//!
//! ## Module Structure
//!
//! - [`commands`]: Job control sequences (init, start, end, status)
//! - [`graphics`]: Raster graphics command (`GS v 0`)
//!
//! ## Usage Example
//!
//! ```
//! use ctp500::printer::BitPolarity;
//! use ctp500::protocol::{commands, graphics};
//! use ctp500::render::canvas::Bitmap;
//!
//! let bitmap = Bitmap::new(384, 24);
//! let raster = graphics::raster(&bitmap, BitPolarity::BlackIsZero).unwrap();
//!
//! // Each sequence is written as its own device write
//! let writes: [&[u8]; 4] = [commands::INIT, commands::START_JOB, &raster, commands::END_JOB];
//! assert_eq!(writes[2].len(), 8 + 48 * 24);
//! ```

pub mod commands;
pub mod graphics;
