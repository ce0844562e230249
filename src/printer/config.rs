//! # Printer Configuration
//!
//! This module defines the hardware specification of the supported printer
//! and the per-job configuration handed to every pipeline stage.
//!
//! ## Supported Printers
//!
//! | Model | Width (dots) | Resolution | Default polarity |
//! |-------|--------------|------------|------------------|
//! | CTP500 | 384 | 203 DPI | black = 0-bit |
//!
//! ## Usage
//!
//! ```
//! use ctp500::printer::{Config, PrinterConfig};
//!
//! let config = Config::default();
//! assert_eq!(config.printer.width_dots, PrinterConfig::CTP500.width_dots);
//! config.validate().unwrap();
//! ```
//!
//! The configuration is built once by the entry point and passed by
//! reference. Library code never reads the environment.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::Ctp500Error;

// ============================================================================
// BIT POLARITY
// ============================================================================

/// Mapping between a black pixel and the bit sent to the device.
///
/// Packing a 1-bit canvas naturally yields 0-bits for black and 1-bits for
/// white. Some firmware expects the opposite; this is a calibration switch
/// for the device, not a property of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitPolarity {
    /// Natural packing: 0-bit = black, 1-bit = white
    #[default]
    BlackIsZero,
    /// Inverted packing: 1-bit = black (every data byte is flipped)
    BlackIsOne,
}

impl BitPolarity {
    /// Build from the `black_is_one` flag.
    pub fn from_black_is_one(black_is_one: bool) -> Self {
        if black_is_one {
            Self::BlackIsOne
        } else {
            Self::BlackIsZero
        }
    }

    #[inline]
    pub fn black_is_one(self) -> bool {
        matches!(self, Self::BlackIsOne)
    }
}

/// Interpret a loose boolean flag value (`1`, `true`, `TRUE`, `yes`, `on`).
///
/// Anything else, including the empty string, is `false`.
///
/// ```
/// use ctp500::printer::config::parse_truthy;
///
/// assert!(parse_truthy(" yes "));
/// assert!(!parse_truthy("0"));
/// ```
pub fn parse_truthy(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "TRUE" | "yes" | "on")
}

// ============================================================================
// PRINTER
// ============================================================================

/// # Printer Configuration
///
/// Defines the hardware characteristics of a thermal printer.
///
/// ```text
/// dots_per_mm = dpi / 25.4
///
/// For CTP500:
///   dots_per_mm = 203 / 25.4 ≈ 8
///   width_mm = 384 / 8 = 48mm
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrinterConfig {
    /// Printer model name
    pub name: &'static str,

    /// Print width in dots (pixels); normally a multiple of 8
    pub width_dots: u32,

    /// Resolution in dots per inch
    pub dpi: u16,

    /// Bit polarity expected by the device
    pub polarity: BitPolarity,
}

impl PrinterConfig {
    /// # CTP500 Configuration
    ///
    /// 58mm paper width BLE thermal receipt printer.
    ///
    /// | Property | Value |
    /// |----------|-------|
    /// | Paper width | 58mm |
    /// | Print width | 48mm (384 dots) |
    /// | Resolution | 203 DPI |
    /// | Interface | Bluetooth LE |
    pub const CTP500: Self = Self {
        name: "CTP500",
        width_dots: 384,
        dpi: 203,
        polarity: BitPolarity::BlackIsZero,
    };

    /// Width in bytes of one raster row (rounded up to whole bytes).
    #[inline]
    pub fn width_bytes(&self) -> u32 {
        self.width_dots.div_ceil(8)
    }

    /// Calculate dots per millimeter
    #[inline]
    pub fn dots_per_mm(&self) -> f32 {
        self.dpi as f32 / 25.4
    }

    /// Convert dots to millimeters
    #[inline]
    pub fn dots_to_mm(&self, dots: u32) -> f32 {
        dots as f32 / self.dots_per_mm()
    }

    /// Same printer with a different polarity.
    pub fn with_polarity(mut self, polarity: BitPolarity) -> Self {
        self.polarity = polarity;
        self
    }
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self::CTP500
    }
}

// ============================================================================
// TEXT RENDERING
// ============================================================================

/// Default font size (points for TrueType, nominal pixel height for the
/// built-in font).
pub const DEFAULT_FONT_SIZE: f32 = 28.0;

/// Height of the scratch canvas text is drawn onto before trimming.
pub const TEXT_CANVAS_HEIGHT_PX: u32 = 5000;

/// Blank rows kept below the last line of text after trimming.
pub const TRIM_BOTTOM_MARGIN_PX: u32 = 10;

/// Extra pixels between consecutive text lines.
pub const LINE_SPACING_PX: u32 = 4;

/// Text layout settings.
#[derive(Debug, Clone, PartialEq)]
pub struct TextConfig {
    /// TrueType/OpenType font file. `None` uses the built-in bitmap font.
    pub font_path: Option<PathBuf>,
    /// Font size
    pub font_size: f32,
    /// Minimum height of the scratch canvas (grows when the text needs more)
    pub canvas_height: u32,
    /// Rows preserved below the content when trimming
    pub trim_margin: u32,
    /// Extra pixels between lines
    pub line_spacing: u32,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font_path: None,
            font_size: DEFAULT_FONT_SIZE,
            canvas_height: TEXT_CANVAS_HEIGHT_PX,
            trim_margin: TRIM_BOTTOM_MARGIN_PX,
            line_spacing: LINE_SPACING_PX,
        }
    }
}

// ============================================================================
// TRANSPORT
// ============================================================================

/// Default bytes per device write.
pub const DEFAULT_CHUNK_SIZE: usize = 180;

/// Pause after each raster chunk.
pub const DEFAULT_CHUNK_DELAY: Duration = Duration::from_millis(20);

/// Pause after each control sequence.
pub const DEFAULT_COMMAND_DELAY: Duration = Duration::from_millis(100);

/// Pause between a status request and reading the reply.
pub const DEFAULT_STATUS_DELAY: Duration = Duration::from_millis(200);

/// Longest a single write may take before the link is considered dead.
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(5);

/// Chunked transport pacing.
///
/// The delays compensate for buffering inside the wireless link; there is
/// no flow control to tell us when the printer is ready. They are tuned
/// empirically and are not adaptive.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportConfig {
    /// Maximum bytes per write
    pub chunk_size: usize,
    /// Sleep after every raster chunk
    pub chunk_delay: Duration,
    /// Sleep after every control sequence
    pub command_delay: Duration,
    /// Sleep between status request and status read
    pub status_delay: Duration,
    /// Per-write timeout
    pub write_timeout: Duration,
    /// Endpoint the status reply is read from, if the device has one
    pub status_endpoint: Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_delay: DEFAULT_CHUNK_DELAY,
            command_delay: DEFAULT_COMMAND_DELAY,
            status_delay: DEFAULT_STATUS_DELAY,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
            status_endpoint: None,
        }
    }
}

// ============================================================================
// JOB CONFIGURATION
// ============================================================================

/// Everything a print job needs, constructed once by the entry point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub printer: PrinterConfig,
    pub text: TextConfig,
    pub transport: TransportConfig,
}

impl Config {
    /// Check the configuration before any device I/O happens.
    pub fn validate(&self) -> Result<(), Ctp500Error> {
        if self.printer.width_dots == 0 {
            return Err(Ctp500Error::Config(
                "printer width must be greater than zero".to_string(),
            ));
        }
        if self.printer.width_bytes() > u16::MAX as u32 {
            return Err(Ctp500Error::Config(format!(
                "printer width {} exceeds the raster command limit",
                self.printer.width_dots
            )));
        }
        if self.transport.chunk_size == 0 {
            return Err(Ctp500Error::Config(
                "chunk size must be greater than zero".to_string(),
            ));
        }
        if !(self.text.font_size > 0.0) {
            return Err(Ctp500Error::Config(format!(
                "font size must be positive, got {}",
                self.text.font_size
            )));
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
