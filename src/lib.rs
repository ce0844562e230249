//! # ctp500 - Thermal Printer Library
//!
//! Prints text and images on CTP500-class ESC/POS thermal printers. It
//! provides:
//!
//! - **Text layout**: greedy word wrap with TrueType or built-in fonts
//! - **Image preparation**: trimming, scaling and Floyd–Steinberg dithering
//! - **Protocol implementation**: `GS v 0` raster encoding and job framing
//! - **Transport**: chunked, paced delivery over a serial/RFCOMM link
//!
//! ## Quick Start
//!
//! ```no_run
//! use ctp500::{
//!     job,
//!     printer::Config,
//!     transport::{ChunkedTransport, SerialLink},
//! };
//!
//! # async fn demo() -> Result<(), ctp500::Ctp500Error> {
//! let config = Config::default();
//!
//! // Render, dither and encode
//! let raster = job::text_job("Hello World", &config)?;
//!
//! // Send to printer
//! let link = SerialLink::open("/dev/rfcomm0")?;
//! let mut transport = ChunkedTransport::new(link, config.transport.clone())?;
//! transport.print(&raster.data).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`job`] | Text/image to raster command buffer |
//! | [`render`] | Layout, trimming, normalization, dithering |
//! | [`protocol`] | Control sequences and raster encoding |
//! | [`transport`] | Device links and the chunked transport |
//! | [`printer`] | Printer and job configuration |
//! | [`error`] | Error types |
//!
//! ## Supported Printers
//!
//! Currently tested with:
//! - CTP500 (58mm paper, 384 dots, 203 DPI, Bluetooth)

pub mod error;
pub mod job;
pub mod printer;
pub mod protocol;
pub mod render;
pub mod transport;

// Re-exports for convenience
pub use error::Ctp500Error;
pub use printer::{Config, PrinterConfig};
pub use transport::{ChunkedTransport, SerialLink};
