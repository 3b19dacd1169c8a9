//! Per-driver channel ownership, operation serialization and state tracking.

use std::sync::Arc;
use std::time::Duration;

use openrouting_errors::{Result, RoutingError};
use openrouting_transport::{Channel, ChannelFault, ChannelOptions};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, error, info};

use crate::driver::DriverState;

#[derive(Debug)]
struct LinkState {
    state: DriverState,
    failure: Option<String>,
}

impl LinkState {
    /// Move to `Failed` unless already closing or terminal.
    fn fail(&mut self, reason: String) -> bool {
        if !self.state.is_usable() {
            return false;
        }
        self.state = DriverState::Failed;
        self.failure = Some(reason);
        true
    }
}

/// The channel a driver owns plus the state machine around it.
///
/// Every write takes the operation lock for its whole duration, so bytes of
/// two operations never interleave on the wire. Channel faults move the link
/// to [`DriverState::Failed`]; it is never reopened internally.
pub struct DeviceLink {
    family_id: &'static str,
    address: String,
    channel: Channel,
    state: Arc<Mutex<LinkState>>,
    op_lock: tokio::sync::Mutex<()>,
    monitor: Mutex<Option<JoinHandle<()>>>,
    close_window: Duration,
}

impl DeviceLink {
    /// Open the channel for `address` and start tracking it.
    ///
    /// # Errors
    ///
    /// Propagates the channel's open failure.
    pub async fn open(
        family_id: &'static str,
        address: &str,
        options: &ChannelOptions,
    ) -> Result<Self> {
        debug!(family = family_id, address, "opening driver");
        let channel = Channel::open(address, options).await?;
        Ok(Self::with_channel(family_id, address, channel, options.close_timeout))
    }

    /// Track an already open channel.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn with_channel(
        family_id: &'static str,
        address: impl Into<String>,
        channel: Channel,
        close_window: Duration,
    ) -> Self {
        let address = address.into();
        let state = Arc::new(Mutex::new(LinkState {
            state: DriverState::Opening,
            failure: None,
        }));

        let monitor = tokio::spawn(
            watch_faults(Arc::clone(&state), channel.faults(), family_id, address.clone())
                .in_current_span(),
        );

        {
            let mut guard = state.lock();
            if guard.state == DriverState::Opening {
                guard.state = DriverState::Open;
            }
        }
        info!(family = family_id, address = %address, kind = %channel.kind(), "driver open");

        Self {
            family_id,
            address,
            channel,
            state,
            op_lock: tokio::sync::Mutex::new(()),
            monitor: Mutex::new(Some(monitor)),
            close_window,
        }
    }

    pub fn family_id(&self) -> &'static str {
        self.family_id
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    pub fn state(&self) -> DriverState {
        self.state.lock().state
    }

    /// Fail with `DriverClosed`/`DriverFailed` unless operations are accepted.
    ///
    /// # Errors
    ///
    /// See above.
    pub fn ensure_usable(&self) -> Result<()> {
        let guard = self.state.lock();
        match guard.state {
            DriverState::Opening | DriverState::Open => Ok(()),
            DriverState::Closing | DriverState::Closed => {
                Err(RoutingError::driver_closed(self.family_id, &self.address))
            }
            DriverState::Failed => Err(RoutingError::driver_failed(
                self.family_id,
                &self.address,
                guard.failure.clone().unwrap_or_else(|| "channel fault".to_string()),
            )),
        }
    }

    /// Write `bytes` as one operation.
    ///
    /// # Errors
    ///
    /// `DriverClosed`/`DriverFailed` when unusable, else the channel's write
    /// error.
    pub async fn write(&self, bytes: &[u8]) -> Result<()> {
        let _turn = self.op_lock.lock().await;
        self.ensure_usable()?;
        self.channel.write(bytes).await?;
        Ok(())
    }

    /// Write ASCII `text` as one operation.
    ///
    /// # Errors
    ///
    /// As [`DeviceLink::write`], plus `NonAsciiText`.
    pub async fn write_text(&self, text: &str) -> Result<()> {
        let _turn = self.op_lock.lock().await;
        self.ensure_usable()?;
        self.channel.write_text(text).await?;
        Ok(())
    }

    /// Close the channel.
    ///
    /// Waits for an in-flight operation for at most the close window. A
    /// closed link stays closed and a failed link stays failed.
    ///
    /// # Errors
    ///
    /// The channel's close error when it had to be force-released.
    pub async fn close(&self) -> Result<()> {
        let _turn = tokio::time::timeout(self.close_window, self.op_lock.lock())
            .await
            .ok();

        let was_failed = {
            let mut guard = self.state.lock();
            match guard.state {
                DriverState::Closing | DriverState::Closed => return Ok(()),
                DriverState::Failed => true,
                DriverState::Opening | DriverState::Open => {
                    guard.state = DriverState::Closing;
                    false
                }
            }
        };

        if let Some(monitor) = self.monitor.lock().take() {
            monitor.abort();
        }
        let closed = self.channel.close().await;

        if !was_failed {
            self.state.lock().state = DriverState::Closed;
        }
        info!(family = self.family_id, address = %self.address, "driver closed");
        closed.map_err(RoutingError::from)
    }
}

impl Drop for DeviceLink {
    fn drop(&mut self) {
        if let Some(monitor) = self.monitor.get_mut().take() {
            monitor.abort();
        }
    }
}

async fn watch_faults(
    state: Arc<Mutex<LinkState>>,
    mut faults: watch::Receiver<Option<ChannelFault>>,
    family_id: &'static str,
    address: String,
) {
    loop {
        let fault = faults.borrow_and_update().clone();
        if let Some(fault) = fault {
            let failed = state.lock().fail(fault.to_string());
            if failed {
                error!(family = family_id, address = %address, %fault, "channel fault, driver failed");
            }
            return;
        }
        if faults.changed().await.is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, duplex};
    use tracing_test::traced_test;

    use openrouting_transport::TransportKind;

    use super::*;

    fn link(close_window: Duration) -> (DeviceLink, tokio::io::DuplexStream) {
        let (local, remote) = duplex(256);
        let channel = Channel::from_stream(
            TransportKind::Network,
            "10.0.0.5:23",
            local,
            &ChannelOptions::default(),
        );
        (
            DeviceLink::with_channel("test-family", "ip:10.0.0.5", channel, close_window),
            remote,
        )
    }

    #[tokio::test]
    async fn test_starts_open() {
        let (link, _remote) = link(Duration::from_millis(100));
        assert_eq!(link.state(), DriverState::Open);
        assert_eq!(link.address(), "ip:10.0.0.5");
        assert_eq!(link.family_id(), "test-family");
    }

    #[tokio::test]
    async fn test_close_then_write_is_rejected() -> Result<()> {
        let (link, mut remote) = link(Duration::from_millis(100));
        link.close().await?;
        assert_eq!(link.state(), DriverState::Closed);

        let err = link.write(b"x").await;
        assert!(matches!(err, Err(RoutingError::DriverClosed { .. })));

        let mut rest = Vec::new();
        let read = tokio::time::timeout(Duration::from_secs(1), remote.read_to_end(&mut rest)).await;
        assert!(matches!(read, Ok(Ok(0))));

        link.close().await?;
        Ok(())
    }

    #[tokio::test]
    #[traced_test]
    async fn test_fault_fails_link() -> Result<()> {
        let (link, remote) = link(Duration::from_millis(100));
        drop(remote);

        let mut faults = link.channel().faults();
        let faulted = tokio::time::timeout(Duration::from_secs(1), faults.wait_for(Option::is_some))
            .await
            .map(|seen| seen.is_ok());
        assert!(matches!(faulted, Ok(true)));
        for _ in 0..100 {
            if link.state() == DriverState::Failed {
                break;
            }
            tokio::task::yield_now().await;
        }

        assert_eq!(link.state(), DriverState::Failed);
        assert!(matches!(
            link.write(b"x").await,
            Err(RoutingError::DriverFailed { .. })
        ));
        assert!(logs_contain("channel fault, driver failed"));

        link.close().await?;
        assert_eq!(link.state(), DriverState::Failed);
        Ok(())
    }
}
