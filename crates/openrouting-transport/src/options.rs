//! Channel configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{DEFAULT_CLOSE_TIMEOUT, DEFAULT_OPEN_TIMEOUT, DEFAULT_TCP_PORT};

/// Number of data bits per serial character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataBits {
    Five,
    Six,
    Seven,
    Eight,
}

impl DataBits {
    /// Parse the numeric form used in configuration files.
    ///
    /// # Errors
    ///
    /// Returns a message naming the accepted values.
    pub fn from_count(bits: u8) -> Result<Self, String> {
        match bits {
            5 => Ok(DataBits::Five),
            6 => Ok(DataBits::Six),
            7 => Ok(DataBits::Seven),
            8 => Ok(DataBits::Eight),
            _ => Err(format!("data bits must be one of: 5, 6, 7, 8 (got {bits})")),
        }
    }
}

impl From<DataBits> for tokio_serial::DataBits {
    fn from(bits: DataBits) -> Self {
        match bits {
            DataBits::Five => tokio_serial::DataBits::Five,
            DataBits::Six => tokio_serial::DataBits::Six,
            DataBits::Seven => tokio_serial::DataBits::Seven,
            DataBits::Eight => tokio_serial::DataBits::Eight,
        }
    }
}

/// Serial parity checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    None,
    Odd,
    Even,
}

impl Parity {
    /// # Errors
    ///
    /// Returns a message naming the accepted values.
    pub fn from_name(name: &str) -> Result<Self, String> {
        match name.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Parity::None),
            "odd" => Ok(Parity::Odd),
            "even" => Ok(Parity::Even),
            _ => Err(format!("parity must be one of: none, odd, even (got {name})")),
        }
    }
}

impl From<Parity> for tokio_serial::Parity {
    fn from(parity: Parity) -> Self {
        match parity {
            Parity::None => tokio_serial::Parity::None,
            Parity::Odd => tokio_serial::Parity::Odd,
            Parity::Even => tokio_serial::Parity::Even,
        }
    }
}

/// Number of serial stop bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopBits {
    One,
    Two,
}

impl From<StopBits> for tokio_serial::StopBits {
    fn from(bits: StopBits) -> Self {
        match bits {
            StopBits::One => tokio_serial::StopBits::One,
            StopBits::Two => tokio_serial::StopBits::Two,
        }
    }
}

/// Serial flow control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowControl {
    None,
    Software,
    Hardware,
}

impl From<FlowControl> for tokio_serial::FlowControl {
    fn from(flow: FlowControl) -> Self {
        match flow {
            FlowControl::None => tokio_serial::FlowControl::None,
            FlowControl::Software => tokio_serial::FlowControl::Software,
            FlowControl::Hardware => tokio_serial::FlowControl::Hardware,
        }
    }
}

/// Line settings for `port:` addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialSettings {
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub flow_control: FlowControl,
}

impl SerialSettings {
    pub fn new(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            ..Self::default()
        }
    }

    pub fn with_data_bits(mut self, data_bits: DataBits) -> Self {
        self.data_bits = data_bits;
        self
    }

    pub fn with_parity(mut self, parity: Parity) -> Self {
        self.parity = parity;
        self
    }

    pub fn with_stop_bits(mut self, stop_bits: StopBits) -> Self {
        self.stop_bits = stop_bits;
        self
    }

    pub fn with_flow_control(mut self, flow_control: FlowControl) -> Self {
        self.flow_control = flow_control;
        self
    }
}

/// 9600 baud, 8 data bits, no parity, 1 stop bit, no flow control.
impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            baud_rate: 9600,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            flow_control: FlowControl::None,
        }
    }
}

/// Options applied when opening a [`Channel`](crate::Channel).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelOptions {
    /// Line settings, used for serial addresses only
    pub serial: SerialSettings,
    /// Port for `ip:` addresses that carry none
    pub default_port: u16,
    /// Bound on establishing the transport; `None` waits indefinitely
    pub open_timeout: Option<Duration>,
    /// Bound on an orderly close
    pub close_timeout: Duration,
    /// Size of the read buffer feeding data listeners
    pub read_buffer_size: usize,
    /// Number of inbound chunks a slow data listener may lag behind
    pub listener_capacity: usize,
}

impl ChannelOptions {
    pub fn builder() -> ChannelOptionsBuilder {
        ChannelOptionsBuilder::new()
    }
}

impl Default for ChannelOptions {
    fn default() -> Self {
        Self {
            serial: SerialSettings::default(),
            default_port: DEFAULT_TCP_PORT,
            open_timeout: Some(DEFAULT_OPEN_TIMEOUT),
            close_timeout: DEFAULT_CLOSE_TIMEOUT,
            read_buffer_size: 1024,
            listener_capacity: 64,
        }
    }
}

/// Builder for [`ChannelOptions`].
#[derive(Debug, Clone, Default)]
pub struct ChannelOptionsBuilder {
    options: ChannelOptions,
}

impl ChannelOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serial(mut self, serial: SerialSettings) -> Self {
        self.options.serial = serial;
        self
    }

    pub fn default_port(mut self, port: u16) -> Self {
        self.options.default_port = port;
        self
    }

    pub fn open_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.options.open_timeout = timeout;
        self
    }

    pub fn close_timeout(mut self, timeout: Duration) -> Self {
        self.options.close_timeout = timeout;
        self
    }

    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.options.read_buffer_size = size.max(1);
        self
    }

    pub fn listener_capacity(mut self, capacity: usize) -> Self {
        self.options.listener_capacity = capacity.max(1);
        self
    }

    pub fn build(self) -> ChannelOptions {
        self.options
    }
}
