//! Packet framing and checksum.

use openrouting_errors::ProtocolError;

/// Largest data segment: the length byte carries data length + 1.
pub const MAX_DATA_LEN: usize = 254;

/// Bytes around the data segment: type, length and checksum.
const FRAMING_LEN: usize = 3;

/// Packet type byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PacketType(pub u8);

impl PacketType {
    pub const COMMAND: Self = Self(0x02);
}

/// Checksum over a data segment.
///
/// `(!sum(data)) - data.len()`, all in wrapping 8-bit arithmetic.
pub fn checksum(data: &[u8]) -> u8 {
    let sum = data.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    // The length is reduced modulo 256 like every other term.
    #[allow(clippy::cast_possible_truncation)]
    let len = data.len() as u8;
    (!sum).wrapping_sub(len)
}

/// A framed packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    packet_type: PacketType,
    data: Vec<u8>,
}

impl Packet {
    /// # Errors
    ///
    /// Returns [`ProtocolError::Packet`] when `data` is empty or longer than
    /// [`MAX_DATA_LEN`].
    pub fn new(packet_type: PacketType, data: Vec<u8>) -> Result<Self, ProtocolError> {
        if data.is_empty() {
            return Err(ProtocolError::packet("data segment is empty"));
        }
        if data.len() > MAX_DATA_LEN {
            return Err(ProtocolError::packet(format!(
                "data segment of {} bytes exceeds {MAX_DATA_LEN}",
                data.len()
            )));
        }
        Ok(Self { packet_type, data })
    }

    pub fn packet_type(&self) -> PacketType {
        self.packet_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn checksum(&self) -> u8 {
        checksum(&self.data)
    }

    /// Value of the length byte: data length + 1.
    pub fn length_byte(&self) -> u8 {
        // `new` bounds the data at 254 bytes.
        u8::try_from(self.data.len().saturating_add(1)).unwrap_or(u8::MAX)
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len().saturating_add(FRAMING_LEN));
        out.push(self.packet_type.0);
        out.push(self.length_byte());
        out.extend_from_slice(&self.data);
        out.push(self.checksum());
        out
    }

    /// Decode one complete packet.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Packet`] when the buffer is truncated, has
    /// trailing bytes or declares an empty data segment, and
    /// [`ProtocolError::Checksum`] when the trailing byte does not match.
    pub fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let [packet_type, length, rest @ ..] = bytes else {
            return Err(ProtocolError::packet(format!(
                "truncated header: {} bytes",
                bytes.len()
            )));
        };

        let data_len = usize::from(*length).checked_sub(1).ok_or_else(|| {
            ProtocolError::packet("length byte 0 leaves no room for data")
        })?;
        let expected_total = data_len.saturating_add(1);
        if rest.len() != expected_total {
            return Err(ProtocolError::packet(format!(
                "length byte {length} needs {expected_total} more bytes, got {}",
                rest.len()
            )));
        }

        let Some((&actual, data)) = rest.split_last() else {
            return Err(ProtocolError::packet("missing checksum"));
        };
        let expected = checksum(data);
        if expected != actual {
            return Err(ProtocolError::Checksum { expected, actual });
        }

        Self::new(PacketType(*packet_type), data.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_power_on_block() {
        assert_eq!(checksum(&[0xC0, 0xC0, 0x29, 0x3E]), 0x14);
    }

    #[test]
    fn test_checksum_wraps() {
        assert_eq!(checksum(&[0xFF]), 0xFF);
        assert_eq!(checksum(&[0x00]), 0xFE);
    }

    #[test]
    fn test_packet_rejects_empty() {
        assert!(matches!(
            Packet::new(PacketType::COMMAND, Vec::new()),
            Err(ProtocolError::Packet(_))
        ));
    }

    #[test]
    fn test_packet_size_limit() -> Result<(), ProtocolError> {
        let packet = Packet::new(PacketType::COMMAND, vec![0; MAX_DATA_LEN])?;
        assert_eq!(packet.length_byte(), 255);
        assert!(matches!(
            Packet::new(PacketType::COMMAND, vec![0; MAX_DATA_LEN + 1]),
            Err(ProtocolError::Packet(_))
        ));
        Ok(())
    }

    #[test]
    fn test_encode_layout() -> Result<(), ProtocolError> {
        let packet = Packet::new(PacketType::COMMAND, vec![0xC0, 0xC0, 0x2A, 0x3E])?;
        assert_eq!(packet.encode(), vec![0x02, 0x05, 0xC0, 0xC0, 0x2A, 0x3E, 0x13]);
        Ok(())
    }

    #[test]
    fn test_decode_valid() -> Result<(), ProtocolError> {
        let packet = Packet::decode(&[0x02, 0x05, 0xC0, 0xC0, 0x29, 0x3E, 0x14])?;
        assert_eq!(packet.packet_type(), PacketType::COMMAND);
        assert_eq!(packet.data(), &[0xC0, 0xC0, 0x29, 0x3E]);
        Ok(())
    }

    #[test]
    fn test_decode_bad_checksum() {
        assert_eq!(
            Packet::decode(&[0x02, 0x05, 0xC0, 0xC0, 0x29, 0x3E, 0x15]),
            Err(ProtocolError::Checksum {
                expected: 0x14,
                actual: 0x15
            })
        );
    }

    #[test]
    fn test_decode_bad_framing() {
        let cases: [&[u8]; 6] = [
            &[],
            &[0x02],
            &[0x02, 0x00, 0x00],
            &[0x02, 0x01, 0xFF],
            &[0x02, 0x05, 0xC0, 0xC0, 0x29, 0x3E],
            &[0x02, 0x05, 0xC0, 0xC0, 0x29, 0x3E, 0x14, 0x00],
        ];
        for bad in cases {
            assert!(
                matches!(Packet::decode(bad), Err(ProtocolError::Packet(_))),
                "{bad:02x?} should be a packet error"
            );
        }
    }
}
