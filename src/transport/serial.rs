//! # Serial / RFCOMM Link
//!
//! Talks to the printer through a character device, usually the RFCOMM
//! binding of its Bluetooth serial port.
//!
//! ## Bluetooth Setup (Linux)
//!
//! ```bash
//! $ bluetoothctl
//! [bluetooth]# scan on
//! # Look for "CTP500"
//! [bluetooth]# pair XX:XX:XX:XX:XX:XX
//!
//! $ sudo rfcomm bind 0 XX:XX:XX:XX:XX:XX
//! # This creates /dev/rfcomm0
//! ```
//!
//! ## TTY Configuration
//!
//! When the path is a terminal it is switched to raw mode so raster bytes
//! pass through untouched:
//!
//! - **No input processing**, including XON/XOFF: 0x11 and 0x13 occur in
//!   raster data and must not be swallowed as flow control
//! - **No output processing**: OPOST off, no CR/LF translation
//! - **8-bit characters**: CS8, no parity
//! - **Non-canonical, no echo**
//!
//! An existing regular file is truncated and receives the raw byte stream,
//! which is handy for capturing a job. Other device nodes (`/dev/null`, a
//! USB printer class device) are written as-is. A path that does not exist
//! is an error: it is never created.

use std::fs::OpenOptions;
use std::io;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use super::{CharacteristicInfo, DeviceLink, ServiceInfo};
use crate::error::Ctp500Error;

/// Default RFCOMM device path
pub const DEFAULT_DEVICE: &str = "/dev/rfcomm0";

/// Largest single write passed to the device.
pub const MAX_PAYLOAD: usize = 4096;

/// Bytes requested per status read.
const READ_BUFFER: usize = 64;

/// A printer reachable through a device path.
///
/// ## Example
///
/// ```no_run
/// use ctp500::printer::TransportConfig;
/// use ctp500::transport::{ChunkedTransport, SerialLink};
///
/// # async fn demo() -> Result<(), ctp500::error::Ctp500Error> {
/// let link = SerialLink::open("/dev/rfcomm0")?;
/// let mut transport = ChunkedTransport::new(link, TransportConfig::default())?;
/// transport.print(&[]).await?;
/// # Ok(())
/// # }
/// ```
pub struct SerialLink {
    path: PathBuf,
    file: File,
    kind: TargetKind,
}

/// What the opened path turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TargetKind {
    Tty,
    Capture,
    Device,
}

impl SerialLink {
    /// Open a device path.
    ///
    /// ## Errors
    ///
    /// Returns a transport error if:
    /// - The path cannot be opened (missing device, permission denied;
    ///   may need the dialout group)
    /// - TTY configuration fails
    pub fn open<P: AsRef<Path>>(device: P) -> Result<Self, Ctp500Error> {
        let path = device.as_ref();

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| {
                Ctp500Error::Transport(format!("Failed to open {}: {}", path.display(), e))
            })?;
        let metadata = file.metadata().map_err(|e| {
            Ctp500Error::Transport(format!("Failed to stat {}: {}", path.display(), e))
        })?;

        let kind = if unsafe { libc::isatty(file.as_raw_fd()) } == 1 {
            configure_tty_raw(file.as_raw_fd())?;
            log::debug!("Configured {} for raw mode", path.display());
            TargetKind::Tty
        } else if metadata.is_file() {
            file.set_len(0).map_err(|e| {
                Ctp500Error::Transport(format!("Failed to truncate {}: {}", path.display(), e))
            })?;
            log::info!("{} is a regular file, capturing raw output", path.display());
            TargetKind::Capture
        } else {
            log::debug!("{} is not a terminal, writing as-is", path.display());
            TargetKind::Device
        };

        Ok(Self {
            path: path.to_path_buf(),
            file: File::from_std(file),
            kind,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_tty(&self) -> bool {
        self.kind == TargetKind::Tty
    }

    /// True when output goes to a regular file rather than a device.
    pub fn is_capture(&self) -> bool {
        self.kind == TargetKind::Capture
    }
}

#[async_trait]
impl DeviceLink for SerialLink {
    fn max_payload(&self) -> usize {
        MAX_PAYLOAD
    }

    async fn write(&mut self, data: &[u8]) -> Result<(), Ctp500Error> {
        self.file
            .write_all(data)
            .await
            .map_err(|e| Ctp500Error::Transport(format!("Write failed: {}", e)))?;
        self.file
            .flush()
            .await
            .map_err(|e| Ctp500Error::Transport(format!("Flush failed: {}", e)))
    }

    /// Serial ports have a single channel, so `endpoint` is ignored.
    async fn read(&mut self, _endpoint: &str) -> Result<Vec<u8>, Ctp500Error> {
        let mut buf = vec![0u8; READ_BUFFER];
        let n = self
            .file
            .read(&mut buf)
            .await
            .map_err(|e| Ctp500Error::Transport(format!("Read failed: {}", e)))?;
        buf.truncate(n);
        Ok(buf)
    }

    async fn list_services(&mut self) -> Result<Vec<ServiceInfo>, Ctp500Error> {
        Ok(vec![ServiceInfo {
            uuid: self.path.display().to_string(),
            description: match self.kind {
                TargetKind::Tty => "Serial port".to_string(),
                TargetKind::Capture => "Capture file".to_string(),
                TargetKind::Device => "Device node".to_string(),
            },
            characteristics: vec![CharacteristicInfo {
                uuid: self.path.display().to_string(),
                properties: vec!["read".to_string(), "write".to_string()],
                description: "Raw byte stream".to_string(),
            }],
        }])
    }
}

/// Configure a file descriptor for raw TTY mode.
///
/// - **Input flags**: IGNBRK, BRKINT, PARMRK, ISTRIP, INLCR, IGNCR, ICRNL, IXON, IXOFF, IXANY
/// - **Output flags**: OPOST
/// - **Local flags**: ECHO, ECHONL, ICANON, ISIG, IEXTEN
/// - **Control flags**: CSIZE, PARENB (then CS8 is set)
fn configure_tty_raw(fd: i32) -> Result<(), Ctp500Error> {
    use std::mem::MaybeUninit;

    let mut termios = MaybeUninit::uninit();
    let result = unsafe { libc::tcgetattr(fd, termios.as_mut_ptr()) };
    if result != 0 {
        return Err(Ctp500Error::Transport(format!(
            "tcgetattr failed: {}",
            io::Error::last_os_error()
        )));
    }
    let mut termios = unsafe { termios.assume_init() };

    termios.c_iflag &= !(libc::IGNBRK
        | libc::BRKINT
        | libc::PARMRK
        | libc::ISTRIP
        | libc::INLCR
        | libc::IGNCR
        | libc::ICRNL
        | libc::IXON
        | libc::IXOFF
        | libc::IXANY);
    termios.c_oflag &= !libc::OPOST;
    termios.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
    termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
    termios.c_cflag |= libc::CS8;

    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, &termios) };
    if result != 0 {
        return Err(Ctp500Error::Transport(format!(
            "tcsetattr failed: {}",
            io::Error::last_os_error()
        )));
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("ctp500-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_default_device_path() {
        assert_eq!(DEFAULT_DEVICE, "/dev/rfcomm0");
    }

    #[tokio::test]
    async fn test_capture_to_regular_file() {
        let path = temp_path("capture.bin");
        std::fs::write(&path, b"stale contents").unwrap();

        let mut link = SerialLink::open(&path).unwrap();
        assert!(!link.is_tty());
        assert!(link.is_capture());
        link.write(&[0x1B, 0x40]).await.unwrap();
        link.write(&[0x11, 0x13, 0x0A]).await.unwrap();
        drop(link);

        assert_eq!(std::fs::read(&path).unwrap(), vec![0x1B, 0x40, 0x11, 0x13, 0x0A]);
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_list_services_reports_path() {
        let path = temp_path("services.bin");
        std::fs::write(&path, b"").unwrap();
        let mut link = SerialLink::open(&path).unwrap();
        let services = link.list_services().await.unwrap();
        assert_eq!(services.len(), 1);
        assert_eq!(services[0].uuid, path.display().to_string());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_device_is_not_created() {
        let path = temp_path("rfcomm-unbound");
        let _ = std::fs::remove_file(&path);

        let err = SerialLink::open(&path).err().unwrap();

        assert!(matches!(err, Ctp500Error::Transport(_)));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_character_device_used_as_is() {
        let mut link = SerialLink::open("/dev/null").unwrap();
        assert!(!link.is_tty());
        assert!(!link.is_capture());
        link.write(&[0x1B, 0x40]).await.unwrap();
        let services = link.list_services().await.unwrap();
        assert_eq!(services[0].description, "Device node");
    }

    #[test]
    fn test_open_missing_directory_fails() {
        let err = SerialLink::open("/nonexistent-dir/rfcomm0").err().unwrap();
        assert!(matches!(err, Ctp500Error::Transport(_)));
    }
}
