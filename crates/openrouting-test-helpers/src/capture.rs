//! In-memory device end of a command channel.
//!
//! [`capture_channel`] returns a [`Channel`] whose transport is an in-memory
//! duplex pipe, and the [`DeviceCapture`] holding the other end. Tests drive
//! the channel (usually through a driver) and read what the device would have
//! received.

use std::io;
use std::time::Duration;

use openrouting_transport::{Channel, ChannelOptions, TransportKind};
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream, duplex};

/// How long reads wait before giving up.
pub const READ_WAIT: Duration = Duration::from_secs(2);

/// Create a network-kind channel backed by an in-memory pipe of `capacity`
/// bytes, plus the device end.
///
/// Must be called from within a Tokio runtime.
pub fn capture_channel(
    address: &str,
    capacity: usize,
    options: &ChannelOptions,
) -> (Channel, DeviceCapture) {
    let (local, remote) = duplex(capacity.max(1));
    let channel = Channel::from_stream(TransportKind::Network, address, local, options);
    (channel, DeviceCapture { remote })
}

/// The device side of a [`capture_channel`].
#[derive(Debug)]
pub struct DeviceCapture {
    remote: DuplexStream,
}

impl DeviceCapture {
    /// Read exactly `len` bytes.
    ///
    /// # Errors
    ///
    /// `TimedOut` when the bytes do not arrive within [`READ_WAIT`], or the
    /// pipe's read error.
    pub async fn read_exact(&mut self, len: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        tokio::time::timeout(READ_WAIT, self.remote.read_exact(&mut buf))
            .await
            .map_err(|elapsed| io::Error::new(io::ErrorKind::TimedOut, elapsed))??;
        Ok(buf)
    }

    /// Read whatever arrives until the pipe stays quiet for `quiet`.
    ///
    /// # Errors
    ///
    /// The pipe's read error.
    pub async fn read_available(&mut self, quiet: Duration) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut buf = [0u8; 256];
        while let Ok(read) = tokio::time::timeout(quiet, self.remote.read(&mut buf)).await {
            let n = read?;
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }
        Ok(out)
    }

    /// Read until the channel side closes.
    ///
    /// # Errors
    ///
    /// `TimedOut` when the channel is not closed within [`READ_WAIT`], or the
    /// pipe's read error.
    pub async fn read_to_end(&mut self) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        tokio::time::timeout(READ_WAIT, self.remote.read_to_end(&mut out))
            .await
            .map_err(|elapsed| io::Error::new(io::ErrorKind::TimedOut, elapsed))??;
        Ok(out)
    }

    /// Send `bytes` to the channel as if the device had answered.
    ///
    /// # Errors
    ///
    /// The pipe's write error.
    pub async fn reply(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.remote.write_all(bytes).await?;
        self.remote.flush().await
    }

    /// Drop the device end; the channel sees a remote hang-up.
    pub fn hang_up(self) {
        drop(self.remote);
    }
}
