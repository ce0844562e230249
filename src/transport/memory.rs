//! In-memory [`DeviceLink`] that records every write.
//!
//! Writes are timestamped with [`tokio::time::Instant`], so under a paused
//! test clock the gaps between them are exactly the pacing delays.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use super::{DeviceLink, ServiceInfo};
use crate::error::Ctp500Error;

/// Default maximum write size, a typical BLE attribute limit.
pub const DEFAULT_MAX_PAYLOAD: usize = 512;

#[derive(Debug, Clone, Default)]
pub struct MemoryLink {
    writes: Vec<(Instant, Vec<u8>)>,
    responses: HashMap<String, Vec<u8>>,
    services: Vec<ServiceInfo>,
    fail_on_write: Option<usize>,
    write_latency: Option<Duration>,
    max_payload: Option<usize>,
}

impl MemoryLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the maximum write size.
    pub fn with_max_payload(mut self, max_payload: usize) -> Self {
        self.max_payload = Some(max_payload);
        self
    }

    /// Fail the `n`th write (1-based) and every write after it.
    pub fn fail_on_write(mut self, n: usize) -> Self {
        self.fail_on_write = Some(n);
        self
    }

    /// Make every write take `latency` before completing.
    pub fn with_write_latency(mut self, latency: Duration) -> Self {
        self.write_latency = Some(latency);
        self
    }

    /// Bytes returned when `endpoint` is read.
    pub fn with_response(mut self, endpoint: &str, bytes: Vec<u8>) -> Self {
        self.responses.insert(endpoint.to_string(), bytes);
        self
    }

    pub fn with_services(mut self, services: Vec<ServiceInfo>) -> Self {
        self.services = services;
        self
    }

    /// Recorded writes with their timestamps.
    pub fn writes(&self) -> &[(Instant, Vec<u8>)] {
        &self.writes
    }

    /// Recorded write payloads, in order.
    pub fn payloads(&self) -> Vec<&[u8]> {
        self.writes.iter().map(|(_, data)| data.as_slice()).collect()
    }

    /// All written bytes concatenated.
    pub fn bytes(&self) -> Vec<u8> {
        self.writes.iter().flat_map(|(_, data)| data.iter().copied()).collect()
    }

    pub fn write_count(&self) -> usize {
        self.writes.len()
    }
}

#[async_trait]
impl DeviceLink for MemoryLink {
    fn max_payload(&self) -> usize {
        self.max_payload.unwrap_or(DEFAULT_MAX_PAYLOAD)
    }

    async fn write(&mut self, data: &[u8]) -> Result<(), Ctp500Error> {
        if let Some(latency) = self.write_latency {
            tokio::time::sleep(latency).await;
        }
        if self.fail_on_write.is_some_and(|n| self.writes.len() + 1 >= n) {
            return Err(Ctp500Error::Transport("link disconnected".to_string()));
        }
        self.writes.push((Instant::now(), data.to_vec()));
        Ok(())
    }

    async fn read(&mut self, endpoint: &str) -> Result<Vec<u8>, Ctp500Error> {
        self.responses
            .get(endpoint)
            .cloned()
            .ok_or_else(|| Ctp500Error::Transport(format!("no such endpoint: {}", endpoint)))
    }

    async fn list_services(&mut self) -> Result<Vec<ServiceInfo>, Ctp500Error> {
        Ok(self.services.clone())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_writes_in_order() {
        let mut link = MemoryLink::new();
        link.write(&[1, 2]).await.unwrap();
        link.write(&[3]).await.unwrap();
        assert_eq!(link.payloads(), vec![&[1u8, 2][..], &[3u8][..]]);
        assert_eq!(link.bytes(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_fail_on_write() {
        let mut link = MemoryLink::new().fail_on_write(2);
        assert!(link.write(&[1]).await.is_ok());
        assert!(link.write(&[2]).await.is_err());
        assert!(link.write(&[3]).await.is_err());
        assert_eq!(link.write_count(), 1);
    }

    #[tokio::test]
    async fn test_read_response() {
        let mut link = MemoryLink::new().with_response("status", vec![0x00, 0x01]);
        assert_eq!(link.read("status").await.unwrap(), vec![0x00, 0x01]);
        assert!(matches!(
            link.read("other").await,
            Err(Ctp500Error::Transport(_))
        ));
    }

    #[test]
    fn test_max_payload() {
        assert_eq!(MemoryLink::new().max_payload(), DEFAULT_MAX_PAYLOAD);
        assert_eq!(MemoryLink::new().with_max_payload(20).max_payload(), 20);
    }
}
