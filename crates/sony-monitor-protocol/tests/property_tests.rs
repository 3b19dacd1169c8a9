//! Property-based tests for Sony packet framing.

use proptest::prelude::*;
use sony_monitor_protocol::{
    Address, CommandBlock, CommandCode, MAX_DATA_LEN, Packet, PacketType, checksum,
    encode_command,
};

fn address() -> impl Strategy<Value = Address> {
    (0u8..3, 0u8..=15).prop_map(|(kind, number)| {
        let address = match kind {
            0 => Address::all(number),
            1 => Address::group(number),
            _ => Address::monitor(number),
        };
        address.unwrap_or(Address::BROADCAST)
    })
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(500))]

    /// For every valid data length the trailing byte is the checksum of the
    /// packaged data segment, and the length byte is data length + 1.
    #[test]
    fn prop_trailing_byte_is_checksum(data in proptest::collection::vec(any::<u8>(), 1..=MAX_DATA_LEN)) {
        let packet = Packet::new(PacketType::COMMAND, data.clone())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let bytes = packet.encode();

        prop_assert_eq!(bytes.len(), data.len() + 3);
        prop_assert_eq!(bytes.first().copied(), Some(0x02));
        prop_assert_eq!(bytes.get(1).map(|&n| usize::from(n)), Some(data.len() + 1));
        prop_assert_eq!(bytes.get(2..bytes.len() - 1), Some(&data[..]));
        prop_assert_eq!(bytes.last().copied(), Some(checksum(&data)));
    }

    /// Corrupting the checksum byte is always detected.
    #[test]
    fn prop_corrupt_checksum_detected(
        data in proptest::collection::vec(any::<u8>(), 1..=16),
        flip in 1u8..=255,
    ) {
        let mut bytes = Packet::new(PacketType::COMMAND, data)
            .map_err(|e| TestCaseError::fail(e.to_string()))?
            .encode();
        if let Some(last) = bytes.last_mut() {
            *last ^= flip;
        }
        let is_checksum_error = matches!(
            Packet::decode(&bytes),
            Err(sony_monitor_protocol::ProtocolError::Checksum { .. })
        );
        prop_assert!(is_checksum_error);
    }

    /// A packet built by `encode_command` decodes to the same block.
    #[test]
    fn prop_encode_command_decodes(
        dest in address(),
        src in address(),
        code: u16,
        arg0: Option<u8>,
        arg1: u8,
        with_arg1: bool,
    ) {
        let arg1 = if arg0.is_some() && with_arg1 { Some(arg1) } else { None };
        let bytes = encode_command(CommandCode(code), arg0, arg1, dest, src)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let packet = Packet::decode(&bytes).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let block = CommandBlock::decode(packet.data())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        prop_assert_eq!(block.destination(), dest);
        prop_assert_eq!(block.source(), src);
        prop_assert_eq!(block.command(), CommandCode(code));
        prop_assert_eq!(block.arg0(), arg0);
        prop_assert_eq!(block.arg1(), arg1);
    }
}
