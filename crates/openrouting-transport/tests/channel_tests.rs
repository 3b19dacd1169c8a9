//! Channel tests against real loopback transports.

use std::time::Duration;

use openrouting_errors::ChannelError;
use openrouting_transport::{Channel, ChannelFault, ChannelOptions, TransportKind};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

fn options() -> ChannelOptions {
    ChannelOptions::builder()
        .open_timeout(Some(Duration::from_secs(2)))
        .close_timeout(Duration::from_millis(200))
        .build()
}

#[tokio::test]
async fn tcp_with_explicit_port() -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();

    let address = format!("ip:127.0.0.1:{port}");
    let options = options();
    let (channel, accepted) = tokio::join!(Channel::open(&address, &options), listener.accept());
    let channel = channel?;
    let (mut peer, _) = accepted?;

    assert_eq!(channel.kind(), TransportKind::Network);
    assert_eq!(channel.address(), format!("127.0.0.1:{port}"));

    channel.write_text("3*1%\r\n3*2$\r\n").await?;
    let mut buf = [0u8; 12];
    peer.read_exact(&mut buf).await?;
    assert_eq!(&buf, b"3*1%\r\n3*2$\r\n");

    channel.close().await?;
    let mut rest = Vec::new();
    peer.read_to_end(&mut rest).await?;
    assert!(rest.is_empty());
    Ok(())
}

#[tokio::test]
async fn tcp_missing_port_uses_default() -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    let options = ChannelOptions::builder().default_port(port).build();

    let (channel, accepted) = tokio::join!(Channel::open("ip:127.0.0.1", &options), listener.accept());
    let channel = channel?;
    let (mut peer, _) = accepted?;

    channel.write(&[0xAA, 0xBB, 0x03, 0x01, 0x02, 0xEE]).await?;
    let mut buf = [0u8; 6];
    peer.read_exact(&mut buf).await?;
    assert_eq!(buf, [0xAA, 0xBB, 0x03, 0x01, 0x02, 0xEE]);
    Ok(())
}

#[tokio::test]
async fn tcp_peer_hangup_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();

    let address = format!("ip:127.0.0.1:{port}");
    let options = options();
    let (channel, accepted) = tokio::join!(Channel::open(&address, &options), listener.accept());
    let channel = channel?;
    let (peer, _) = accepted?;
    drop(peer);

    let mut faults = channel.faults();
    let fault = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if let Some(fault) = faults.borrow_and_update().clone() {
                return Some(fault);
            }
            if faults.changed().await.is_err() {
                return None;
            }
        }
    })
    .await?;
    assert!(matches!(
        fault,
        Some(ChannelFault::Disconnected | ChannelFault::Read(_))
    ));

    channel.close().await?;
    Ok(())
}

#[tokio::test]
async fn tcp_inbound_bytes_are_published() -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();

    let address = format!("ip:127.0.0.1:{port}");
    let options = options();
    let (channel, accepted) = tokio::join!(Channel::open(&address, &options), listener.accept());
    let channel = channel?;
    let (mut peer, _) = accepted?;
    let mut data = channel.subscribe();

    peer.write_all(b"Out1 In3 All\r\n").await?;
    let mut received = Vec::new();
    while received.len() < 14 {
        received.extend(tokio::time::timeout(Duration::from_secs(2), data.recv()).await??);
    }
    assert_eq!(received, b"Out1 In3 All\r\n".to_vec());
    Ok(())
}

#[tokio::test]
async fn refused_connection_is_an_open_error() -> Result<(), Box<dyn std::error::Error>> {
    // Bind then drop to obtain a port nobody listens on.
    let port = TcpListener::bind("127.0.0.1:0").await?.local_addr()?.port();

    let result = Channel::open(&format!("ip:127.0.0.1:{port}"), &options()).await;
    match result {
        Err(err) => assert!(err.is_open_failure(), "unexpected error {err}"),
        Ok(_) => return Err("connection to a closed port succeeded".into()),
    }
    Ok(())
}

#[tokio::test]
async fn unsupported_address_opens_nothing() {
    for address in ["", "port:", "ip:", "ip:host:port"] {
        let result = Channel::open(address, &options()).await;
        assert!(
            matches!(result, Err(ChannelError::UnsupportedAddress { .. })),
            "{address:?} should be unsupported"
        );
    }
}

#[tokio::test]
async fn missing_serial_device_is_an_open_error() {
    let result = Channel::open("port:/dev/openrouting-does-not-exist", &options()).await;
    assert!(matches!(result, Err(ChannelError::Open { .. })));
}

#[cfg(unix)]
#[tokio::test]
async fn unix_socket_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("switch.sock");
    let listener = tokio::net::UnixListener::bind(&path)?;

    let address = path.display().to_string();
    let options = options();
    let (channel, accepted) = tokio::join!(Channel::open(&address, &options), listener.accept());
    let channel = channel?;
    let (mut peer, _) = accepted?;

    assert_eq!(channel.kind(), TransportKind::LocalSocket);
    assert_eq!(channel.address(), address);

    channel.write(b"\x02\x05\xC0\xC0\x29\x3E\x14").await?;
    let mut buf = [0u8; 7];
    peer.read_exact(&mut buf).await?;
    assert_eq!(&buf, b"\x02\x05\xC0\xC0\x29\x3E\x14");

    channel.close().await?;
    channel.close().await?;
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn missing_unix_socket_is_an_open_error() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let address = dir.path().join("absent.sock").display().to_string();
    let result = Channel::open(&address, &options()).await;
    assert!(matches!(result, Err(ChannelError::Open { .. })));
    Ok(())
}
