//! Input-select frame encoding and parsing.

use openrouting_errors::ProtocolError;
use openrouting_errors::protocol::byte_field;

use crate::{FRAME_HEADER, FRAME_LEN, FRAME_TRAILER, PROTOCOL_MARKER};

/// Command byte selecting the active input.
pub const SELECT_INPUT_COMMAND: u8 = 0x01;

/// A decoded 6-byte frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeslaFrame {
    pub command: u8,
    pub value: u8,
}

impl TeslaFrame {
    pub fn select_input(input: u8) -> Self {
        Self {
            command: SELECT_INPUT_COMMAND,
            value: input,
        }
    }

    pub fn to_bytes(self) -> [u8; FRAME_LEN] {
        [
            FRAME_HEADER[0],
            FRAME_HEADER[1],
            PROTOCOL_MARKER,
            self.command,
            self.value,
            FRAME_TRAILER,
        ]
    }

    /// Parse a frame as written by [`TeslaFrame::to_bytes`].
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Packet`] when the length, header, marker or
    /// trailer do not match.
    pub fn parse(data: &[u8]) -> Result<Self, ProtocolError> {
        let frame: &[u8; FRAME_LEN] = data.try_into().map_err(|_wrong_len| {
            ProtocolError::packet(format!(
                "expected {FRAME_LEN}-byte frame, got {} bytes",
                data.len()
            ))
        })?;

        let [h0, h1, marker, command, value, trailer] = *frame;
        if [h0, h1] != FRAME_HEADER {
            return Err(ProtocolError::packet(format!(
                "bad frame header {h0:#04x} {h1:#04x}"
            )));
        }
        if marker != PROTOCOL_MARKER {
            return Err(ProtocolError::packet(format!(
                "bad protocol marker {marker:#04x}"
            )));
        }
        if trailer != FRAME_TRAILER {
            return Err(ProtocolError::packet(format!(
                "bad frame trailer {trailer:#04x}"
            )));
        }

        Ok(Self { command, value })
    }
}

/// Encode the frame selecting `input`.
///
/// # Errors
///
/// Returns [`ProtocolError::Encode`] when `input` does not fit in one byte.
pub fn encode_select_input(input: u32) -> Result<[u8; FRAME_LEN], ProtocolError> {
    let input = byte_field("input", input)?;
    Ok(TeslaFrame::select_input(input).to_bytes())
}
