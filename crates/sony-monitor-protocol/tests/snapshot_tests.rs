//! Snapshot tests for Sony wire encoding.

use insta::assert_snapshot;
use sony_monitor_protocol::{Address, CommandCode, Packet, PacketType, encode_command};

fn hex(bytes: &[u8]) -> String {
    format!("{bytes:02X?}")
}

#[test]
fn snapshot_power_on() -> Result<(), Box<dyn std::error::Error>> {
    let packet = encode_command(
        CommandCode::POWER_ON,
        None,
        None,
        Address::BROADCAST,
        Address::BROADCAST,
    )?;
    assert_snapshot!(hex(&packet), @"[02, 05, C0, C0, 29, 3E, 14]");
    Ok(())
}

#[test]
fn snapshot_power_off() -> Result<(), Box<dyn std::error::Error>> {
    let packet = encode_command(
        CommandCode::POWER_OFF,
        None,
        None,
        Address::BROADCAST,
        Address::BROADCAST,
    )?;
    assert_snapshot!(hex(&packet), @"[02, 05, C0, C0, 2A, 3E, 13]");
    Ok(())
}

#[test]
fn snapshot_set_channel_3() -> Result<(), Box<dyn std::error::Error>> {
    let packet = encode_command(
        CommandCode::SET_CHANNEL,
        Some(3),
        None,
        Address::BROADCAST,
        Address::BROADCAST,
    )?;
    assert_snapshot!(hex(&packet), @"[02, 06, C0, C0, 21, 00, 03, 56]");
    Ok(())
}

#[test]
fn snapshot_checksum_error() {
    let err = Packet::decode(&[0x02, 0x05, 0xC0, 0xC0, 0x29, 0x3E, 0x00])
        .err()
        .map(|e| e.to_string());
    assert_snapshot!(
        format!("{err:?}"),
        @r#"Some("Checksum mismatch: expected 0x14, got 0x00")"#
    );
}

#[test]
fn snapshot_oversized_packet_error() {
    let err = Packet::new(PacketType::COMMAND, vec![0; 255])
        .err()
        .map(|e| e.to_string());
    assert_snapshot!(
        format!("{err:?}"),
        @r#"Some("Invalid packet: data segment of 255 bytes exceeds 254")"#
    );
}
