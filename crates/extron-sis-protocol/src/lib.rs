//! Extron SIS (Simple Instruction Set) protocol for matrix switchers.
//!
//! This crate is intentionally I/O-free. It turns abstract ties into the ASCII
//! command lines an Extron-compatible switcher expects and parses those lines
//! back for diagnostics.
//!
//! ## Protocol Notes
//!
//! A tie is `{input}*{output}` followed by a one-character suffix selecting
//! which signal is routed, terminated by CR LF:
//!
//! | Suffix | Meaning |
//! |--------|---------|
//! | `%` | video only |
//! | `$` | audio only |
//! | `!` | audio and video |
//!
//! Numbers are plain ASCII decimal, so the wire format has no width limit.
//! There is no checksum and no framing beyond the line terminator. Several
//! ties may be concatenated and sent in a single write; the switcher executes
//! them in order.
//!
//! The routing drivers always send a video tie followed by an audio tie so
//! audio can be broken away from video on switchers that support it.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub use openrouting_errors::ProtocolError;

pub mod tie;

pub use tie::{TieCommand, TieKind, encode_tie, parse_ties};

/// Line terminator after every SIS command.
pub const LINE_TERMINATOR: &str = "\r\n";

/// Separator between input and output numbers.
pub const TIE_SEPARATOR: char = '*';

/// Default TCP port of the SIS telnet interface.
pub const DEFAULT_TCP_PORT: u16 = 23;

/// Default RS-232 baud rate of the SIS serial interface.
pub const DEFAULT_BAUD_RATE: u32 = 9600;
