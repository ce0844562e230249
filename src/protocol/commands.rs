//! # Device Control Sequences
//!
//! Fixed byte sequences the CTP500 expects around a raster job. They are
//! vendor-specific and opaque: reproduce them byte for byte, never build
//! them from parts.
//!
//! ## Job Framing
//!
//! ```text
//! INIT ── pause ── START_JOB ── pause ── raster chunks ... ── END_JOB ── pause
//! ```
//!
//! ## Byte Order
//!
//! Multi-byte integers in raster headers use **little-endian** encoding:
//! - `u16` value 0x1234 is sent as bytes `[0x34, 0x12]`

// ============================================================================
// ESCAPE SEQUENCE CONSTANTS
// ============================================================================

/// ESC (Escape) - Command prefix byte
pub const ESC: u8 = 0x1B;

/// GS (Group Separator) - Extended command prefix
pub const GS: u8 = 0x1D;

/// RS (Record Separator) - Vendor command prefix
pub const RS: u8 = 0x1E;

/// LF (Line Feed) - Print and advance one line
pub const LF: u8 = 0x0A;

// ============================================================================
// JOB CONTROL
// ============================================================================

/// # Initialize Printer (ESC @)
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC @ |
/// | Hex     | 1B 40 |
///
/// Clears the print buffer and resets the printer to its power-on state.
pub const INIT: &[u8] = &[ESC, b'@'];

/// # Begin Raster Job (GS I F0 19)
///
/// | Format  | Bytes |
/// |---------|-------|
/// | Hex     | 1D 49 F0 19 |
///
/// Vendor sequence sent after init; the printer ignores raster data that
/// arrives without it.
pub const START_JOB: &[u8] = &[GS, b'I', 0xF0, 0x19];

/// # End Job and Feed (LF LF LF 9A)
///
/// | Format  | Bytes |
/// |---------|-------|
/// | Hex     | 0A 0A 0A 9A |
///
/// Feeds three lines so the last printed row clears the tear bar, then
/// closes the job. A raster stream without this trailer can leave the
/// printer waiting for data until it is power-cycled.
pub const END_JOB: &[u8] = &[LF, LF, LF, 0x9A];

/// # Request Status (RS G 03)
///
/// | Format  | Bytes |
/// |---------|-------|
/// | Hex     | 1E 47 03 |
///
/// The reply is not returned on the write channel; it must be read from a
/// separate status endpoint.
pub const STATUS_REQUEST: &[u8] = &[RS, b'G', 0x03];

/// Convert a u16 to little-endian bytes [low, high]
#[inline]
pub const fn u16_le(value: u16) -> [u8; 2] {
    value.to_le_bytes()
}

// ============================================================================
// TESTS
// ============================================================================
