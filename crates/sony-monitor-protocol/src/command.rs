//! Command blocks carried in a packet's data segment.

use core::fmt;

use openrouting_errors::ProtocolError;

use crate::address::Address;
use crate::packet::{Packet, PacketType};

/// Two-byte command code, sent big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandCode(pub u16);

impl CommandCode {
    /// Select the input channel; arg0 carries the channel number.
    pub const SET_CHANNEL: Self = Self(0x2100);
    pub const POWER_ON: Self = Self(0x293E);
    pub const POWER_OFF: Self = Self(0x2A3E);

    pub fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for CommandCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::SET_CHANNEL => write!(f, "SET_CHANNEL"),
            Self::POWER_ON => write!(f, "POWER_ON"),
            Self::POWER_OFF => write!(f, "POWER_OFF"),
            Self(code) => write!(f, "{code:#06x}"),
        }
    }
}

/// Shortest block: destination, source and command code.
const MIN_BLOCK_LEN: usize = 4;

/// Longest block: both optional arguments present.
const MAX_BLOCK_LEN: usize = 6;

/// An addressed command with up to two single-byte arguments.
///
/// `arg1` is only ever present together with `arg0`; the constructors
/// enforce this so every value encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandBlock {
    destination: Address,
    source: Address,
    command: CommandCode,
    arg0: Option<u8>,
    arg1: Option<u8>,
}

impl CommandBlock {
    pub fn new(destination: Address, source: Address, command: CommandCode) -> Self {
        Self {
            destination,
            source,
            command,
            arg0: None,
            arg1: None,
        }
    }

    pub fn with_arg0(mut self, arg0: u8) -> Self {
        self.arg0 = Some(arg0);
        self
    }

    pub fn with_args(mut self, arg0: u8, arg1: u8) -> Self {
        self.arg0 = Some(arg0);
        self.arg1 = Some(arg1);
        self
    }

    /// Build a block from optional arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::CommandBlock`] when `arg1` is given without
    /// `arg0`.
    pub fn from_parts(
        destination: Address,
        source: Address,
        command: CommandCode,
        arg0: Option<u8>,
        arg1: Option<u8>,
    ) -> Result<Self, ProtocolError> {
        let block = Self::new(destination, source, command);
        match (arg0, arg1) {
            (None, None) => Ok(block),
            (Some(a0), None) => Ok(block.with_arg0(a0)),
            (Some(a0), Some(a1)) => Ok(block.with_args(a0, a1)),
            (None, Some(_)) => Err(ProtocolError::command_block(
                "arg1 requires arg0 to be present",
            )),
        }
    }

    pub fn destination(&self) -> Address {
        self.destination
    }

    pub fn source(&self) -> Address {
        self.source
    }

    pub fn command(&self) -> CommandCode {
        self.command
    }

    pub fn arg0(&self) -> Option<u8> {
        self.arg0
    }

    pub fn arg1(&self) -> Option<u8> {
        self.arg1
    }

    /// Encoded length: 4, 5 or 6 bytes.
    pub fn encoded_len(&self) -> usize {
        MIN_BLOCK_LEN + usize::from(self.arg0.is_some()) + usize::from(self.arg1.is_some())
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(MAX_BLOCK_LEN);
        out.push(self.destination.to_byte());
        out.push(self.source.to_byte());
        out.extend_from_slice(&self.command.to_be_bytes());
        out.extend(self.arg0);
        out.extend(self.arg1);
        out
    }

    /// Decode a block from a packet data segment.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::CommandBlock`] when the length is not 4-6
    /// bytes or an address byte is invalid.
    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let (&[dest, src, hi, lo], args) = data.split_first_chunk::<MIN_BLOCK_LEN>().ok_or_else(
            || {
                ProtocolError::command_block(format!(
                    "block too short: {} bytes, need at least {MIN_BLOCK_LEN}",
                    data.len()
                ))
            },
        )?;

        let block = Self::new(
            Address::from_byte(dest)?,
            Address::from_byte(src)?,
            CommandCode(u16::from_be_bytes([hi, lo])),
        );
        match *args {
            [] => Ok(block),
            [a0] => Ok(block.with_arg0(a0)),
            [a0, a1] => Ok(block.with_args(a0, a1)),
            _ => Err(ProtocolError::command_block(format!(
                "block too long: {} bytes, at most {MAX_BLOCK_LEN}",
                data.len()
            ))),
        }
    }
}

/// Encode a complete command packet addressed from `source` to `destination`.
///
/// # Errors
///
/// Returns [`ProtocolError::CommandBlock`] when `arg1` is given without `arg0`.
pub fn encode_command(
    command: CommandCode,
    arg0: Option<u8>,
    arg1: Option<u8>,
    destination: Address,
    source: Address,
) -> Result<Vec<u8>, ProtocolError> {
    let block = CommandBlock::from_parts(destination, source, command, arg0, arg1)?;
    Ok(Packet::new(PacketType::COMMAND, block.encode())?.encode())
}
