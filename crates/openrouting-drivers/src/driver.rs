//! The uniform driver contract.

use core::fmt;

use async_trait::async_trait;
use openrouting_errors::Result;
use serde::Serialize;

use crate::descriptor::DriverDescriptor;

/// Lifecycle of a driver handle.
///
/// `Opening -> Open -> Closing -> Closed`, with `Failed` reachable from
/// `Opening` or `Open` on a channel fault. `Closed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverState {
    Opening,
    Open,
    Closing,
    Closed,
    Failed,
}

impl DriverState {
    pub fn is_terminal(self) -> bool {
        matches!(self, DriverState::Closed | DriverState::Failed)
    }

    /// True while operations are accepted.
    pub fn is_usable(self) -> bool {
        matches!(self, DriverState::Opening | DriverState::Open)
    }
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DriverState::Opening => "opening",
            DriverState::Open => "open",
            DriverState::Closing => "closing",
            DriverState::Closed => "closed",
            DriverState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A live handle to one device.
///
/// Calls on one handle are serialized: a later call does not start writing
/// until the previous write finished. Separate handles are independent.
#[async_trait]
pub trait Driver: Send + Sync {
    fn descriptor(&self) -> &DriverDescriptor;

    fn family_id(&self) -> &str {
        &self.descriptor().family_id
    }

    /// Address the handle was opened with.
    fn address(&self) -> &str;

    fn state(&self) -> DriverState;

    /// True when this handle drives `address` with the `family_id` driver.
    ///
    /// Callers reconfiguring a device use this to decide whether the existing
    /// handle can be kept or must be closed and reloaded.
    fn is_bound_to(&self, family_id: &str, address: &str) -> bool {
        self.family_id() == family_id && self.address() == address
    }

    /// Route `input` to the `video` and `audio` outputs; 0 leaves an output
    /// unchanged.
    ///
    /// # Errors
    ///
    /// - `Protocol(Encode)` when a value does not fit the wire format
    /// - `Channel(Write)` when the transport rejects the bytes
    /// - `DriverClosed` / `DriverFailed` when the handle is no longer usable
    async fn activate(&self, input: u32, video: u32, audio: u32) -> Result<()>;

    /// # Errors
    ///
    /// As [`Driver::activate`].
    async fn power_on(&self) -> Result<()>;

    /// # Errors
    ///
    /// As [`Driver::activate`].
    async fn power_off(&self) -> Result<()>;

    /// Close the channel. Later operations fail with `DriverClosed`.
    ///
    /// # Errors
    ///
    /// `Channel(Close)` when the transport had to be force-released; the
    /// handle is closed either way.
    async fn close(&self) -> Result<()>;
}
