//! Address dispatch and option serialization tests.

use std::path::Path;

use insta::assert_snapshot;
use openrouting_transport::{ChannelOptions, DeviceAddress, Parity, SerialSettings, TransportKind};
use proptest::prelude::*;

#[test]
fn dispatch_by_prefix() -> Result<(), Box<dyn std::error::Error>> {
    let serial = DeviceAddress::parse("port:/dev/ttyUSB0")?;
    assert_eq!(serial.kind(), TransportKind::Serial);
    assert_eq!(serial.target(), "/dev/ttyUSB0");

    let with_port = DeviceAddress::parse("ip:10.0.0.5:1234")?;
    assert_eq!(with_port.kind(), TransportKind::Network);
    assert_eq!(with_port.socket_target(23), Some(("10.0.0.5", 1234)));

    let default_port = DeviceAddress::parse("ip:10.0.0.5")?;
    assert_eq!(default_port.socket_target(23), Some(("10.0.0.5", 23)));

    let local = DeviceAddress::parse("/tmp/matrix.sock")?;
    assert_eq!(local.kind(), TransportKind::LocalSocket);
    assert_eq!(local.local_path(), Some(Path::new("/tmp/matrix.sock")));
    Ok(())
}

#[test]
fn display_restores_the_address() -> Result<(), Box<dyn std::error::Error>> {
    for address in ["port:COM3", "ip:switch.local", "ip:10.0.0.5:4000", "/run/sw.sock"] {
        assert_eq!(address.parse::<DeviceAddress>()?.to_string(), address);
    }
    Ok(())
}

#[test]
fn unsupported_address_message() {
    let err = DeviceAddress::parse("ip:10.0.0.5:telnet")
        .err()
        .map(|e| e.to_string());
    assert_snapshot!(
        format!("{err:?}"),
        @r#"Some("Unsupported device address 'ip:10.0.0.5:telnet': malformed port \"telnet\"")"#
    );
}

#[test]
fn default_options_serialize() -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(&ChannelOptions::default())?;
    assert_snapshot!(json, @r#"
    {
      "serial": {
        "baud_rate": 9600,
        "data_bits": "eight",
        "parity": "none",
        "stop_bits": "one",
        "flow_control": "none"
      },
      "default_port": 23,
      "open_timeout": {
        "secs": 10,
        "nanos": 0
      },
      "close_timeout": {
        "secs": 2,
        "nanos": 0
      },
      "read_buffer_size": 1024,
      "listener_capacity": 64
    }
    "#);
    Ok(())
}

#[test]
fn partial_options_fill_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let options: ChannelOptions =
        serde_json::from_str(r#"{"serial": {"baud_rate": 38400, "parity": "odd"}, "open_timeout": null}"#)?;
    assert_eq!(options.serial, SerialSettings::new(38_400).with_parity(Parity::Odd));
    assert_eq!(options.open_timeout, None);
    assert_eq!(options.default_port, 23);
    Ok(())
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(500))]

    #[test]
    fn prop_ipv4_with_port(a: u8, b: u8, c: u8, d: u8, port in 1u16..) {
        let address = DeviceAddress::parse(&format!("ip:{a}.{b}.{c}.{d}:{port}"))
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let host = format!("{a}.{b}.{c}.{d}");
        prop_assert_eq!(address.socket_target(23), Some((host.as_str(), port)));
    }

    #[test]
    fn prop_serial_path_kept_verbatim(path in "[A-Za-z0-9/_.-]{1,32}") {
        let address = DeviceAddress::parse(&format!("port:{path}"))
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(address.kind(), TransportKind::Serial);
        prop_assert_eq!(address.target(), path);
    }

    #[test]
    fn prop_unprefixed_is_local_socket(path in "/[a-z0-9_]{1,16}\\.sock") {
        let address = DeviceAddress::parse(&path)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(address.kind(), TransportKind::LocalSocket);
    }
}
