//! The command channel: one duplex byte link to one device.

use core::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use openrouting_errors::ChannelError;
use parking_lot::Mutex;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info, trace, warn};

use crate::address::{DeviceAddress, TransportKind};
use crate::options::ChannelOptions;

type BoxReader = Box<dyn AsyncRead + Send + Unpin>;
type BoxWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// An asynchronous failure of an open channel.
///
/// Only the first fault is recorded; a faulted channel refuses further
/// writes and should be closed and reopened by its owner.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChannelFault {
    /// The remote end closed the connection.
    #[error("remote end closed the connection")]
    Disconnected,
    /// Reading inbound bytes failed.
    #[error("read failed: {0}")]
    Read(String),
    /// A write failed at the transport level.
    #[error("write failed: {0}")]
    Write(String),
}

struct Shared {
    kind: TransportKind,
    address: String,
    closed: AtomicBool,
    /// Set by `close`; cancels a write stuck on the transport
    closing: watch::Sender<bool>,
    faults: watch::Sender<Option<ChannelFault>>,
    data: broadcast::Sender<Vec<u8>>,
}

impl Shared {
    fn raise(&self, fault: ChannelFault) {
        if self.closed.load(Ordering::Acquire) {
            return;
        }
        let first = self.faults.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(fault.clone());
            true
        });
        if first {
            warn!(kind = %self.kind, address = %self.address, %fault, "channel fault");
        }
    }
}

/// Duplex byte connection to a device.
///
/// Writes are serialized: a write does not start until the previous one
/// finished. Closing is idempotent and bounded by the close timeout.
pub struct Channel {
    shared: Arc<Shared>,
    writer: tokio::sync::Mutex<Option<BoxWriter>>,
    reader: Mutex<Option<JoinHandle<()>>>,
    close_timeout: Duration,
}

impl Channel {
    /// Open the transport named by `address`.
    ///
    /// # Errors
    ///
    /// - [`ChannelError::UnsupportedAddress`] when the address does not
    ///   resolve to a transport
    /// - [`ChannelError::OpenTimeout`] when the transport is not ready within
    ///   `options.open_timeout`
    /// - [`ChannelError::Open`] when the transport refuses to open
    pub async fn open(address: &str, options: &ChannelOptions) -> Result<Self, ChannelError> {
        let parsed = DeviceAddress::parse(address)?;
        let connecting = connect(address, &parsed, options);
        let (reader, writer) = bounded_open(address, options.open_timeout, connecting).await?;

        let channel = Self::from_parts(parsed.kind(), parsed.target(), reader, writer, options);
        info!(kind = %channel.kind(), address = %channel.address(), "channel opened");
        Ok(channel)
    }

    /// Wrap an already connected stream.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn from_stream<S>(
        kind: TransportKind,
        address: impl Into<String>,
        stream: S,
        options: &ChannelOptions,
    ) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (reader, writer) = split(stream);
        Self::from_parts(kind, address.into(), reader, writer, options)
    }

    fn from_parts(
        kind: TransportKind,
        address: String,
        reader: BoxReader,
        writer: BoxWriter,
        options: &ChannelOptions,
    ) -> Self {
        let (faults, _) = watch::channel(None);
        let (closing, _) = watch::channel(false);
        let (data, _) = broadcast::channel(options.listener_capacity.max(1));
        let shared = Arc::new(Shared {
            kind,
            address,
            closed: AtomicBool::new(false),
            closing,
            faults,
            data,
        });

        let task = tokio::spawn(
            read_loop(Arc::clone(&shared), reader, options.read_buffer_size.max(1))
                .in_current_span(),
        );

        Self {
            shared,
            writer: tokio::sync::Mutex::new(Some(writer)),
            reader: Mutex::new(Some(task)),
            close_timeout: options.close_timeout,
        }
    }

    pub fn kind(&self) -> TransportKind {
        self.shared.kind
    }

    /// Address as opened, minus the scheme prefix.
    pub fn address(&self) -> &str {
        &self.shared.address
    }

    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::Acquire)
    }

    /// The recorded fault, if any.
    pub fn fault(&self) -> Option<ChannelFault> {
        self.shared.faults.borrow().clone()
    }

    /// Listen for inbound bytes.
    pub fn subscribe(&self) -> broadcast::Receiver<Vec<u8>> {
        self.shared.data.subscribe()
    }

    /// Watch for faults. The current value is `None` until one occurs.
    pub fn faults(&self) -> watch::Receiver<Option<ChannelFault>> {
        self.shared.faults.subscribe()
    }

    /// Wait for the first fault.
    pub async fn next_fault(&self) -> ChannelFault {
        let mut faults = self.faults();
        loop {
            if let Some(fault) = faults.borrow_and_update().clone() {
                return fault;
            }
            if faults.changed().await.is_err() {
                return ChannelFault::Disconnected;
            }
        }
    }

    /// Write `bytes` and flush.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Write`] when the channel is closed, has
    /// faulted, or the transport rejects the bytes. A write still pending when
    /// the channel is closed is abandoned and fails the same way.
    pub async fn write(&self, bytes: &[u8]) -> Result<(), ChannelError> {
        let mut guard = self.writer.lock().await;
        if self.is_closed() {
            return Err(ChannelError::write(self.address(), "channel is closed"));
        }
        if let Some(fault) = self.fault() {
            return Err(ChannelError::write(
                self.address(),
                format!("channel has failed: {fault}"),
            ));
        }
        let mut closing = self.shared.closing.subscribe();
        let outcome = {
            let Some(writer) = guard.as_mut() else {
                return Err(ChannelError::write(self.address(), "channel is closed"));
            };
            tokio::select! {
                written = async {
                    writer.write_all(bytes).await?;
                    writer.flush().await
                } => Some(written),
                _ = closing.wait_for(|closing| *closing) => None,
            }
        };

        let Some(written) = outcome else {
            // Dropping the writer releases the transport.
            drop(guard.take());
            debug!(address = %self.address(), "write abandoned by close");
            return Err(ChannelError::write(self.address(), "channel closed during write"));
        };

        match written {
            Ok(()) => {
                debug!(
                    kind = %self.kind(),
                    address = %self.address(),
                    bytes = bytes.len(),
                    "wrote to channel"
                );
                Ok(())
            }
            Err(e) => {
                let reason = e.to_string();
                self.shared.raise(ChannelFault::Write(reason.clone()));
                Err(ChannelError::write(self.address(), reason))
            }
        }
    }

    /// Write `text` as single-byte ASCII.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::NonAsciiText`] without writing anything when
    /// `text` is not ASCII, otherwise as [`Channel::write`].
    pub async fn write_text(&self, text: &str) -> Result<(), ChannelError> {
        if !text.is_ascii() {
            return Err(ChannelError::NonAsciiText {
                address: self.address().to_string(),
            });
        }
        self.write(text.as_bytes()).await
    }

    /// Close the transport.
    ///
    /// Resolves immediately when already closed. A transport that does not
    /// acknowledge the close within the close timeout is released anyway.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Close`] when the transport had to be
    /// force-released. The channel counts as closed either way.
    pub async fn close(&self) -> Result<(), ChannelError> {
        if self.shared.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.shared.closing.send_modify(|closing| *closing = true);
        if let Some(task) = self.reader.lock().take() {
            task.abort();
        }

        let faulted = self.fault().is_some();
        let shutdown = async {
            let mut guard = self.writer.lock().await;
            match guard.take() {
                Some(mut writer) => writer.shutdown().await,
                None => Ok(()),
            }
        };

        match tokio::time::timeout(self.close_timeout, shutdown).await {
            Ok(Ok(())) => {
                info!(kind = %self.kind(), address = %self.address(), "channel closed");
                Ok(())
            }
            Ok(Err(e)) if faulted => {
                debug!(address = %self.address(), error = %e, "shutdown of failed channel");
                info!(kind = %self.kind(), address = %self.address(), "channel closed");
                Ok(())
            }
            Ok(Err(e)) => {
                warn!(address = %self.address(), error = %e, "channel close failed, transport released");
                Err(ChannelError::close(self.address(), e))
            }
            Err(_elapsed) => {
                let timeout_ms = millis(self.close_timeout);
                warn!(address = %self.address(), timeout_ms, "channel close timed out, transport released");
                Err(ChannelError::close(
                    self.address(),
                    format!("no acknowledgement within {timeout_ms}ms"),
                ))
            }
        }
    }
}

impl Drop for Channel {
    fn drop(&mut self) {
        if let Some(task) = self.reader.get_mut().take() {
            task.abort();
        }
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("kind", &self.kind())
            .field("address", &self.address())
            .field("closed", &self.is_closed())
            .field("fault", &self.fault())
            .finish()
    }
}

/// Run a connect attempt, giving up after `limit` when one is set.
async fn bounded_open<F, T>(
    address: &str,
    limit: Option<Duration>,
    connecting: F,
) -> Result<T, ChannelError>
where
    F: Future<Output = Result<T, ChannelError>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, connecting)
            .await
            .map_err(|_elapsed| ChannelError::open_timeout(address, millis(limit)))?,
        None => connecting.await,
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn split<S>(stream: S) -> (BoxReader, BoxWriter)
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let (reader, writer) = tokio::io::split(stream);
    (Box::new(reader), Box::new(writer))
}

async fn connect(
    address: &str,
    parsed: &DeviceAddress,
    options: &ChannelOptions,
) -> Result<(BoxReader, BoxWriter), ChannelError> {
    match parsed {
        DeviceAddress::Serial { path } => {
            use tokio_serial::SerialPortBuilderExt;

            let serial = options.serial;
            let stream = tokio_serial::new(path.as_str(), serial.baud_rate)
                .data_bits(serial.data_bits.into())
                .parity(serial.parity.into())
                .stop_bits(serial.stop_bits.into())
                .flow_control(serial.flow_control.into())
                .open_native_async()
                .map_err(|e| ChannelError::open(address, e))?;
            Ok(split(stream))
        }
        DeviceAddress::Network { host, port } => {
            let port = port.unwrap_or(options.default_port);
            let stream = tokio::net::TcpStream::connect((host.as_str(), port))
                .await
                .map_err(|e| ChannelError::open(address, e))?;
            stream
                .set_nodelay(true)
                .map_err(|e| ChannelError::open(address, e))?;
            Ok(split(stream))
        }
        DeviceAddress::LocalSocket { path } => connect_local(address, path).await,
    }
}

#[cfg(unix)]
async fn connect_local(
    address: &str,
    path: &std::path::Path,
) -> Result<(BoxReader, BoxWriter), ChannelError> {
    let stream = tokio::net::UnixStream::connect(path)
        .await
        .map_err(|e| ChannelError::open(address, e))?;
    Ok(split(stream))
}

#[cfg(windows)]
async fn connect_local(
    address: &str,
    path: &std::path::Path,
) -> Result<(BoxReader, BoxWriter), ChannelError> {
    let pipe = tokio::net::windows::named_pipe::ClientOptions::new()
        .open(path)
        .map_err(|e| ChannelError::open(address, e))?;
    Ok(split(pipe))
}

#[cfg(not(any(unix, windows)))]
async fn connect_local(
    address: &str,
    _path: &std::path::Path,
) -> Result<(BoxReader, BoxWriter), ChannelError> {
    Err(ChannelError::unsupported(
        address,
        "local sockets are not available on this platform",
    ))
}

async fn read_loop(shared: Arc<Shared>, mut reader: BoxReader, buffer_size: usize) {
    let mut buf = vec![0u8; buffer_size];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) => {
                shared.raise(ChannelFault::Disconnected);
                break;
            }
            Ok(n) => {
                let chunk = buf.get(..n).map(<[u8]>::to_vec).unwrap_or_default();
                trace!(address = %shared.address, bytes = n, "read from channel");
                if shared.data.send(chunk).is_err() {
                    trace!(address = %shared.address, "no data listeners");
                }
            }
            Err(e) => {
                shared.raise(ChannelFault::Read(e.to_string()));
                break;
            }
        }
    }
}
