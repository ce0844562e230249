//! # Error Types
//!
//! This module defines error types used throughout the ctp500 library.
//!
//! Anything raised before the transport is constructed (configuration,
//! image decoding, raster preconditions) aborts a job before a single byte
//! reaches the printer. Transport errors abort mid-job; a partially sent
//! raster stream cannot be resumed, so callers restart from the init
//! sequence.

use thiserror::Error;

/// Main error type for ctp500 operations
#[derive(Debug, Error)]
pub enum Ctp500Error {
    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Font resource could not be loaded
    #[error("Font error: {0}")]
    Font(String),

    /// Image could not be read or decoded
    #[error("Image error: {0}")]
    Image(String),

    /// Raster precondition violated (e.g. width not a multiple of 8)
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),

    /// Transport-level errors (write/read failure, disconnect, timeout)
    #[error("Transport error: {0}")]
    Transport(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for Ctp500Error {
    fn from(err: image::ImageError) -> Self {
        Ctp500Error::Image(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_converts() {
        fn read_missing() -> Result<String, Ctp500Error> {
            Ok(std::fs::read_to_string("/nonexistent/ctp500-message.txt")?)
        }

        let err = read_missing().err().unwrap();
        assert!(matches!(err, Ctp500Error::Io(_)));
        assert!(err.to_string().starts_with("I/O error: "));
    }

    #[test]
    fn test_image_error_maps_to_image() {
        let err: Ctp500Error = image::load_from_memory(b"not an image").err().unwrap().into();
        assert!(matches!(err, Ctp500Error::Image(_)));
    }
}
