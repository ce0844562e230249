//! # Chunked Paced Transport
//!
//! Sends a raster command buffer to the printer over a [`DeviceLink`].
//!
//! ## Job Sequence
//!
//! ```text
//! write INIT       sleep command_delay
//! write START_JOB  sleep command_delay
//! write chunk 1    sleep chunk_delay
//! ...
//! write chunk N    sleep chunk_delay
//! write END_JOB    sleep command_delay
//! ```
//!
//! Chunks are consecutive slices of at most `chunk_size` bytes; only the
//! last may be shorter. A zero delay skips the sleep entirely.
//!
//! There is no flow control on the link, so the delays are the only thing
//! keeping the printer's buffer from overflowing. Writes never overlap:
//! each one completes before the next begins.
//!
//! Any failed or timed-out write aborts the job. Nothing further is sent;
//! the caller has to start over from INIT.

use std::time::Duration;

use tokio::time::{sleep, timeout};

use super::{DeviceLink, ServiceInfo};
use crate::error::Ctp500Error;
use crate::printer::TransportConfig;
use crate::protocol::commands;

/// Progress is logged every this many chunks.
const PROGRESS_INTERVAL: usize = 10;

/// Outcome of a completed print job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobReport {
    /// Raster chunks written
    pub chunks: usize,
    /// Raster bytes written (excluding control sequences)
    pub bytes: usize,
}

/// Drives print jobs over an exclusively owned link.
pub struct ChunkedTransport<L: DeviceLink> {
    link: L,
    config: TransportConfig,
}

impl<L: DeviceLink> ChunkedTransport<L> {
    /// Wrap a link.
    ///
    /// Fails with a configuration error if the chunk size is zero or larger
    /// than the link's maximum write.
    pub fn new(link: L, config: TransportConfig) -> Result<Self, Ctp500Error> {
        if config.chunk_size == 0 {
            return Err(Ctp500Error::Config(
                "chunk size must be greater than zero".to_string(),
            ));
        }
        if config.chunk_size > link.max_payload() {
            return Err(Ctp500Error::Config(format!(
                "chunk size {} exceeds the link's maximum write of {} bytes",
                config.chunk_size,
                link.max_payload()
            )));
        }
        Ok(Self { link, config })
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    /// Give the link back.
    pub fn into_inner(self) -> L {
        self.link
    }

    async fn pause(duration: Duration) {
        if !duration.is_zero() {
            sleep(duration).await;
        }
    }

    async fn write(&mut self, data: &[u8]) -> Result<(), Ctp500Error> {
        match timeout(self.config.write_timeout, self.link.write(data)).await {
            Ok(result) => result,
            Err(_) => Err(Ctp500Error::Transport(format!(
                "write of {} bytes timed out after {:?}",
                data.len(),
                self.config.write_timeout
            ))),
        }
    }

    async fn command(&mut self, sequence: &[u8]) -> Result<(), Ctp500Error> {
        self.write(sequence).await?;
        Self::pause(self.config.command_delay).await;
        Ok(())
    }

    /// Send the initialize and begin-raster sequences.
    pub async fn send_init_and_start(&mut self) -> Result<(), Ctp500Error> {
        log::debug!("Sending init and start-of-job");
        self.command(commands::INIT).await?;
        self.command(commands::START_JOB).await
    }

    /// Write `data` in paced chunks. Returns the number of chunks written.
    ///
    /// Empty data performs no writes.
    pub async fn write_long(&mut self, data: &[u8]) -> Result<usize, Ctp500Error> {
        let chunk_size = self.config.chunk_size;
        let total = data.len().div_ceil(chunk_size);

        for (i, chunk) in data.chunks(chunk_size).enumerate() {
            let n = i + 1;
            if let Err(e) = self.write(chunk).await {
                log::error!("Chunk {}/{} failed, aborting job", n, total);
                return Err(e);
            }
            Self::pause(self.config.chunk_delay).await;

            if n % PROGRESS_INTERVAL == 0 || n == total {
                log::info!("Sent chunk {}/{}", n, total);
            }
        }

        Ok(total)
    }

    /// Send the end-of-job sequence (feeds the paper out).
    pub async fn send_end(&mut self) -> Result<(), Ctp500Error> {
        log::debug!("Sending end-of-job");
        self.command(commands::END_JOB).await
    }

    /// Run a complete job: init, start, raster chunks, end.
    pub async fn print(&mut self, raster: &[u8]) -> Result<JobReport, Ctp500Error> {
        log::info!(
            "Printing {} bytes in chunks of {}",
            raster.len(),
            self.config.chunk_size
        );
        self.send_init_and_start().await?;
        let chunks = self.write_long(raster).await?;
        self.send_end().await?;
        Ok(JobReport {
            chunks,
            bytes: raster.len(),
        })
    }

    /// Ask the printer for its status.
    ///
    /// Returns `Ok(None)` without writing anything when no status endpoint
    /// is configured.
    pub async fn request_status(&mut self) -> Result<Option<Vec<u8>>, Ctp500Error> {
        let Some(endpoint) = self.config.status_endpoint.clone() else {
            log::warn!("No status endpoint configured, skipping status request");
            return Ok(None);
        };

        self.write(commands::STATUS_REQUEST).await?;
        Self::pause(self.config.status_delay).await;

        let reply = match timeout(self.config.write_timeout, self.link.read(&endpoint)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(Ctp500Error::Transport(format!(
                    "status read from {} timed out",
                    endpoint
                )));
            }
        };
        log::info!("Status reply: {:02X?}", reply);
        Ok(Some(reply))
    }

    /// Enumerate the link's services and characteristics.
    pub async fn list_services(&mut self) -> Result<Vec<ServiceInfo>, Ctp500Error> {
        self.link.list_services().await
    }
}

// ============================================================================
// TESTS
// ============================================================================
