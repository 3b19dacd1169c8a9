//! Wire-format errors shared by the protocol codec crates.

use crate::common::ErrorSeverity;

/// Encode/decode failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// A value does not fit the field it is encoded into.
    #[error("Cannot encode {field}={value}: wire format allows at most {max}")]
    Encode {
        /// Field being encoded
        field: &'static str,
        /// Value supplied by the caller
        value: u32,
        /// Largest representable value
        max: u32,
    },

    /// A packet is structurally invalid (length, framing, type).
    #[error("Invalid packet: {0}")]
    Packet(String),

    /// A packet checksum does not match its data.
    #[error("Checksum mismatch: expected {expected:#04x}, got {actual:#04x}")]
    Checksum {
        /// Checksum computed over the data
        expected: u8,
        /// Checksum carried by the packet
        actual: u8,
    },

    /// A command block is structurally invalid.
    #[error("Invalid command block: {0}")]
    CommandBlock(String),
}

impl ProtocolError {
    /// Get the error severity.
    pub fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Error
    }

    /// Create an encode error.
    pub fn encode(field: &'static str, value: u32, max: u32) -> Self {
        ProtocolError::Encode { field, value, max }
    }

    /// Create a packet error.
    pub fn packet(msg: impl Into<String>) -> Self {
        ProtocolError::Packet(msg.into())
    }

    /// Create a command block error.
    pub fn command_block(msg: impl Into<String>) -> Self {
        ProtocolError::CommandBlock(msg.into())
    }
}

/// Narrow a caller-supplied value to a single wire byte.
///
/// # Errors
///
/// Returns [`ProtocolError::Encode`] when `value` exceeds `u8::MAX`.
pub fn byte_field(field: &'static str, value: u32) -> Result<u8, ProtocolError> {
    u8::try_from(value).map_err(|_overflow| ProtocolError::encode(field, value, u32::from(u8::MAX)))
}
