//! Device address parsing.

use core::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use openrouting_errors::ChannelError;
use serde::{Deserialize, Serialize};

/// Prefix selecting a serial port.
pub const SERIAL_PREFIX: &str = "port:";

/// Prefix selecting a raw TCP connection.
pub const NETWORK_PREFIX: &str = "ip:";

/// Kind of transport behind a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransportKind {
    Serial,
    Network,
    LocalSocket,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Serial => write!(f, "serial"),
            TransportKind::Network => write!(f, "network"),
            TransportKind::LocalSocket => write!(f, "local-socket"),
        }
    }
}

/// A parsed device address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeviceAddress {
    /// `port:<path>`
    Serial { path: String },
    /// `ip:<host>[:<port>]`; IPv6 hosts are stored without brackets.
    Network { host: String, port: Option<u16> },
    /// Bare path to a Unix domain socket or named pipe.
    LocalSocket { path: PathBuf },
}

impl DeviceAddress {
    /// Resolve an address string to a transport.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::UnsupportedAddress`] for an empty address, an
    /// empty remainder after the prefix, a malformed port, or a local socket
    /// path on a platform without local sockets.
    pub fn parse(address: &str) -> Result<Self, ChannelError> {
        if address.is_empty() {
            return Err(ChannelError::unsupported(address, "address is empty"));
        }

        if let Some(path) = address.strip_prefix(SERIAL_PREFIX) {
            if path.is_empty() {
                return Err(ChannelError::unsupported(address, "serial port path is empty"));
            }
            return Ok(DeviceAddress::Serial {
                path: path.to_string(),
            });
        }

        if let Some(rest) = address.strip_prefix(NETWORK_PREFIX) {
            let (host, port) = split_host_port(rest)
                .map_err(|reason| ChannelError::unsupported(address, reason))?;
            return Ok(DeviceAddress::Network {
                host: host.to_string(),
                port,
            });
        }

        if cfg!(any(unix, windows)) {
            Ok(DeviceAddress::LocalSocket {
                path: PathBuf::from(address),
            })
        } else {
            Err(ChannelError::unsupported(
                address,
                "local sockets are not available on this platform",
            ))
        }
    }

    pub fn kind(&self) -> TransportKind {
        match self {
            DeviceAddress::Serial { .. } => TransportKind::Serial,
            DeviceAddress::Network { .. } => TransportKind::Network,
            DeviceAddress::LocalSocket { .. } => TransportKind::LocalSocket,
        }
    }

    /// The address with its scheme prefix removed.
    pub fn target(&self) -> String {
        match self {
            DeviceAddress::Serial { path } => path.clone(),
            DeviceAddress::Network { host, port } => format_host_port(host, *port),
            DeviceAddress::LocalSocket { path } => path.display().to_string(),
        }
    }

    /// Host and port to connect to, filling in `default_port` when absent.
    pub fn socket_target(&self, default_port: u16) -> Option<(&str, u16)> {
        match self {
            DeviceAddress::Network { host, port } => {
                Some((host.as_str(), port.unwrap_or(default_port)))
            }
            _ => None,
        }
    }

    pub fn local_path(&self) -> Option<&Path> {
        match self {
            DeviceAddress::LocalSocket { path } => Some(path),
            _ => None,
        }
    }
}

impl FromStr for DeviceAddress {
    type Err = ChannelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceAddress::Serial { path } => write!(f, "{SERIAL_PREFIX}{path}"),
            DeviceAddress::Network { .. } => write!(f, "{NETWORK_PREFIX}{}", self.target()),
            DeviceAddress::LocalSocket { path } => write!(f, "{}", path.display()),
        }
    }
}

fn format_host_port(host: &str, port: Option<u16>) -> String {
    let bracketed = host.contains(':');
    match (bracketed, port) {
        (true, Some(port)) => format!("[{host}]:{port}"),
        (true, None) => format!("[{host}]"),
        (false, Some(port)) => format!("{host}:{port}"),
        (false, None) => host.to_string(),
    }
}

/// Split `host[:port]`, `[v6]` or `[v6]:port`. An unbracketed host with more
/// than one colon is taken as a bare IPv6 literal without port.
fn split_host_port(rest: &str) -> Result<(&str, Option<u16>), String> {
    let (host, port) = if let Some(bracketed) = rest.strip_prefix('[') {
        let (host, tail) = bracketed
            .split_once(']')
            .ok_or_else(|| "unterminated '[' in IPv6 host".to_string())?;
        match tail {
            "" => (host, None),
            _ => {
                let port = tail
                    .strip_prefix(':')
                    .ok_or_else(|| format!("unexpected {tail:?} after IPv6 host"))?;
                (host, Some(port))
            }
        }
    } else if rest.matches(':').count() > 1 {
        (rest, None)
    } else {
        match rest.split_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (rest, None),
        }
    };

    if host.is_empty() {
        return Err("host is empty".to_string());
    }

    let port = port.map(parse_port).transpose()?;
    Ok((host, port))
}

fn parse_port(port: &str) -> Result<u16, String> {
    if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("malformed port {port:?}"));
    }
    match port.parse::<u16>() {
        Ok(0) => Err("port 0 is not connectable".to_string()),
        Ok(port) => Ok(port),
        Err(e) => Err(format!("malformed port {port:?}: {e}")),
    }
}
