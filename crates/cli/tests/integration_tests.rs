//! Integration tests for the routectl binary

use std::io::Read;
use std::net::TcpListener;
use std::thread;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn routectl() -> Result<Command, Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("routectl")?;
    cmd.env_remove("ROUTECTL_CONFIG")
        .env_remove("ROUTECTL_OPEN_TIMEOUT_MS")
        .env_remove("ROUTECTL_CLOSE_TIMEOUT_MS")
        .env_remove("RUST_LOG");
    Ok(cmd)
}

/// Accept one connection and return everything sent before it closed.
fn capture_one_connection() -> Result<(u16, thread::JoinHandle<Vec<u8>>), std::io::Error> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let port = listener.local_addr()?.port();
    let handle = thread::spawn(move || {
        let mut received = Vec::new();
        if let Ok((mut stream, _)) = listener.accept() {
            let _read = stream.read_to_end(&mut received);
        }
        received
    });
    Ok((port, handle))
}

#[test]
fn test_cli_help() -> TestResult {
    routectl()?
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ip:<host>[:<port>]"));
    Ok(())
}

#[test]
fn test_list_human() -> TestResult {
    routectl()?
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("extron-sis"))
        .stdout(predicate::str::contains("tesla-switch"))
        .stdout(predicate::str::contains("sony-monitor"));
    Ok(())
}

#[test]
fn test_list_json() -> TestResult {
    let output = routectl()?.args(["list", "--json"]).output()?;
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout)?;
    let ids: Vec<&str> = value["data"]
        .as_array()
        .map(|a| a.iter().filter_map(|d| d["family_id"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(ids, ["extron-sis", "tesla-switch", "sony-monitor"]);
    Ok(())
}

#[test]
fn test_unknown_family_exit_code() -> TestResult {
    routectl()?
        .args(["tie", "nonexistent", "ip:127.0.0.1", "1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown device family 'nonexistent'"));
    Ok(())
}

#[test]
fn test_unknown_family_json_error() -> TestResult {
    let output = routectl()?
        .args(["--json", "power", "nonexistent", "ip:127.0.0.1", "on"])
        .output()?;
    assert_eq!(output.status.code(), Some(2));
    let value: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["success"], false);
    assert_eq!(value["error"]["exit_code"], 2);
    Ok(())
}

#[test]
fn test_unsupported_address_exit_code() -> TestResult {
    routectl()?
        .args(["tie", "extron-sis", "ip:", "1"])
        .assert()
        .code(3);
    Ok(())
}

#[test]
fn test_tie_over_tcp() -> TestResult {
    let (port, received) = capture_one_connection()?;
    routectl()?
        .args(["tie", "extron-sis", &format!("ip:127.0.0.1:{port}"), "3", "1", "2"])
        .assert()
        .success();

    let bytes = received.join().map_err(|_panic| "capture thread panicked")?;
    assert_eq!(bytes, b"3*1%\r\n3*2$\r\n");
    Ok(())
}

#[test]
fn test_tesla_input_out_of_range() -> TestResult {
    let (port, received) = capture_one_connection()?;
    routectl()?
        .args(["tie", "tesla-switch", &format!("ip:127.0.0.1:{port}"), "300"])
        .assert()
        .code(4);

    let bytes = received.join().map_err(|_panic| "capture thread panicked")?;
    assert!(bytes.is_empty());
    Ok(())
}

#[test]
fn test_sony_power_off_over_tcp() -> TestResult {
    let (port, received) = capture_one_connection()?;
    routectl()?
        .args(["--json", "power", "sony-monitor", &format!("ip:127.0.0.1:{port}"), "off"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"success\": true"));

    let bytes = received.join().map_err(|_panic| "capture thread panicked")?;
    assert_eq!(bytes, [0x02, 0x05, 0xC0, 0xC0, 0x2A, 0x3E, 0x13]);
    Ok(())
}

#[test]
fn test_invalid_config_file() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("routectl.yaml");
    std::fs::write(&path, "close_timeout_ms: [oops")?;

    routectl()?
        .args(["--config", &path.to_string_lossy(), "list"])
        .assert()
        .code(6);
    Ok(())
}
