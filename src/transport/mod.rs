//! # Printer Transport Layer
//!
//! Moves a finished raster stream to the printer.
//!
//! The printer only needs an ordered byte pipe with a small maximum write
//! size. [`DeviceLink`] is that pipe; [`ChunkedTransport`] drives the job
//! over it (control sequences, chunking, pacing, status polling).
//!
//! ## Available Links
//!
//! - [`serial`]: RFCOMM / serial tty device, or a plain file for capture
//! - [`memory`]: in-memory recorder for tests and dry runs

pub mod chunked;
pub mod memory;
pub mod serial;

use async_trait::async_trait;

use crate::error::Ctp500Error;

pub use chunked::{ChunkedTransport, JobReport};
pub use memory::MemoryLink;
pub use serial::SerialLink;

/// A characteristic (endpoint) exposed by a device service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacteristicInfo {
    pub uuid: String,
    /// e.g. `read`, `write`, `write-without-response`, `notify`
    pub properties: Vec<String>,
    pub description: String,
}

/// A service exposed by the device, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInfo {
    pub uuid: String,
    pub description: String,
    pub characteristics: Vec<CharacteristicInfo>,
}

/// An ordered, reliable byte pipe to the printer.
///
/// Only one writer may drive a link at a time; interleaved writes from two
/// jobs corrupt both. [`ChunkedTransport`] takes ownership of its link for
/// that reason.
#[async_trait]
pub trait DeviceLink: Send {
    /// Largest single write the link accepts, in bytes.
    fn max_payload(&self) -> usize;

    /// Write `data` as one unit.
    async fn write(&mut self, data: &[u8]) -> Result<(), Ctp500Error>;

    /// Read whatever the device has queued on `endpoint`.
    async fn read(&mut self, endpoint: &str) -> Result<Vec<u8>, Ctp500Error>;

    /// Enumerate services and characteristics.
    async fn list_services(&mut self) -> Result<Vec<ServiceInfo>, Ctp500Error>;
}
