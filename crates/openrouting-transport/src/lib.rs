//! Command channels for AV routing hardware.
//!
//! A [`Channel`] is a duplex byte connection to one device. The transport is
//! chosen from the textual device address by literal prefix:
//!
//! | Address | Transport |
//! |---------|-----------|
//! | `port:<path>` | serial port, settings from [`SerialSettings`] |
//! | `ip:<host>[:<port>]` | raw TCP, port defaults to [`DEFAULT_TCP_PORT`] |
//! | anything else | local socket (Unix domain socket, named pipe on Windows) |
//!
//! Writes resolve once the transport accepted and flushed the bytes. Inbound
//! bytes are published to [`Channel::subscribe`] listeners for diagnostics and
//! never parsed here. Read failures and remote hang-ups are published as
//! [`ChannelFault`]s so the owner can stop using the link.
//!
//! # Example
//!
//! ```no_run
//! use openrouting_transport::{Channel, ChannelOptions};
//!
//! # async fn run() -> Result<(), openrouting_errors::ChannelError> {
//! let channel = Channel::open("ip:10.0.0.5", &ChannelOptions::default()).await?;
//! channel.write_text("1*2%\r\n").await?;
//! channel.close().await?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]

use std::time::Duration;

pub mod address;
pub mod channel;
pub mod options;

pub use address::{DeviceAddress, TransportKind};
pub use channel::{Channel, ChannelFault};
pub use options::{ChannelOptions, ChannelOptionsBuilder, DataBits, FlowControl, Parity, SerialSettings, StopBits};

/// TCP port used when an `ip:` address has none.
pub const DEFAULT_TCP_PORT: u16 = 23;

/// Default bound on establishing a transport.
pub const DEFAULT_OPEN_TIMEOUT: Duration = Duration::from_secs(10);

/// Default bound on an orderly close before the transport is force-released.
pub const DEFAULT_CLOSE_TIMEOUT: Duration = Duration::from_secs(2);
