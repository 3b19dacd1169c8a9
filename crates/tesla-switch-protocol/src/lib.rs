//! Protocol for Tesla-class (TESmart-compatible) HDMI switches.
//!
//! The switch accepts a single fixed 6-byte frame to select the active input:
//!
//! | Byte | Value | Meaning |
//! |------|-------|---------|
//! | 0 | `0xAA` | header |
//! | 1 | `0xBB` | header |
//! | 2 | `0x03` | protocol marker |
//! | 3 | `0x01` | command: select input |
//! | 4 | input | 1-based input number |
//! | 5 | `0xEE` | trailer |
//!
//! There is no checksum. The switch routes audio together with video and has
//! a single output, so only the input number is encoded. There is no power
//! command.
//!
//! This crate is I/O-free and allocation-free.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub use openrouting_errors::ProtocolError;

pub mod frame;

pub use frame::{SELECT_INPUT_COMMAND, TeslaFrame, encode_select_input};

/// Length of every frame in bytes.
pub const FRAME_LEN: usize = 6;

/// Two-byte frame header.
pub const FRAME_HEADER: [u8; 2] = [0xAA, 0xBB];

/// Protocol marker following the header.
pub const PROTOCOL_MARKER: u8 = 0x03;

/// Frame trailer.
pub const FRAME_TRAILER: u8 = 0xEE;

/// Default TCP port of network-attached models.
pub const DEFAULT_TCP_PORT: u16 = 23;

/// Default RS-232 baud rate.
pub const DEFAULT_BAUD_RATE: u32 = 9600;
