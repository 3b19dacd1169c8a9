//! Snapshot tests for Tesla-class wire encoding.

use insta::assert_snapshot;
use tesla_switch_protocol as tesla;

#[test]
fn snapshot_select_input_1() -> Result<(), Box<dyn std::error::Error>> {
    let frame = tesla::encode_select_input(1)?;
    assert_snapshot!(format!("{frame:02X?}"), @"[AA, BB, 03, 01, 01, EE]");
    Ok(())
}

#[test]
fn snapshot_select_input_16() -> Result<(), Box<dyn std::error::Error>> {
    let frame = tesla::encode_select_input(16)?;
    assert_snapshot!(format!("{frame:02X?}"), @"[AA, BB, 03, 01, 10, EE]");
    Ok(())
}

#[test]
fn snapshot_encode_error() {
    let err = tesla::encode_select_input(300).err().map(|e| e.to_string());
    assert_snapshot!(
        format!("{err:?}"),
        @r#"Some("Cannot encode input=300: wire format allows at most 255")"#
    );
}
