//! Serial control protocol for Sony professional broadcast monitors.
//!
//! This crate is I/O-free. It builds the checksummed packets a monitor expects
//! on its RS-485 remote port and decodes them again for diagnostics.
//!
//! ## Packet layout
//!
//! | Offset | Size | Meaning |
//! |--------|------|---------|
//! | 0 | 1 | packet type ([`PacketType::COMMAND`] for commands) |
//! | 1 | 1 | length `N` = data length + 1 |
//! | 2 | `N - 1` | data (one command block) |
//! | `N + 1` | 1 | checksum |
//!
//! The checksum is `(!sum(data)) - (N - 1)` in wrapping 8-bit arithmetic.
//!
//! ## Command block layout
//!
//! | Offset | Size | Meaning |
//! |--------|------|---------|
//! | 0 | 1 | destination [`Address`] |
//! | 1 | 1 | source [`Address`] |
//! | 2 | 2 | [`CommandCode`], big-endian |
//! | 4 | 0-1 | arg0 |
//! | 5 | 0-1 | arg1 (only present with arg0) |
//!
//! An address byte is a kind in the upper two bits (`ALL`, `GROUP`, `MONITOR`)
//! and a number `0..=15` in the lower nibble.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub use openrouting_errors::ProtocolError;

pub mod address;
pub mod command;
pub mod packet;

pub use address::{Address, AddressKind};
pub use command::{CommandBlock, CommandCode, encode_command};
pub use packet::{MAX_DATA_LEN, Packet, PacketType, checksum};

/// Default RS-485 baud rate of the remote port.
pub const DEFAULT_BAUD_RATE: u32 = 38_400;

/// Default TCP port when the monitor sits behind a serial-to-network bridge.
pub const DEFAULT_TCP_PORT: u16 = 23;
