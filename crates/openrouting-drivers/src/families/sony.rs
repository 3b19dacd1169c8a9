//! Sony professional monitors on the RS-485 remote bus.

use std::time::Duration;

use async_trait::async_trait;
use openrouting_errors::Result;
use openrouting_errors::protocol::byte_field;
use openrouting_transport::{Channel, ChannelOptions, DataBits, Parity, SerialSettings, StopBits};
use sony_monitor_protocol::{Address, CommandCode, encode_command};
use tracing::debug;

use super::PROVIDER;
use crate::descriptor::{Capabilities, DriverDescriptor, DriverMetadata};
use crate::driver::{Driver, DriverState};
use crate::link::DeviceLink;
use crate::registry::DriverFactory;

/// Driver for Sony monitors.
///
/// Every command is broadcast from and to `ALL|0` as one framed packet.
/// `activate` selects `input` as the monitor channel; the output arguments
/// have no meaning for a monitor.
pub struct SonyDriver {
    descriptor: DriverDescriptor,
    link: DeviceLink,
}

impl SonyDriver {
    pub const FAMILY_ID: &'static str = "sony-monitor";

    pub fn descriptor() -> DriverDescriptor {
        DriverDescriptor::new(Self::FAMILY_ID, Capabilities::empty()).with_metadata(
            "en",
            DriverMetadata::new("Sony professional monitor", "Sony", PROVIDER),
        )
    }

    /// 38400 baud, 8 data bits, odd parity, 1 stop bit.
    pub fn serial_settings() -> SerialSettings {
        SerialSettings::new(sony_monitor_protocol::DEFAULT_BAUD_RATE)
            .with_data_bits(DataBits::Eight)
            .with_parity(Parity::Odd)
            .with_stop_bits(StopBits::One)
    }

    pub fn channel_options(options: &ChannelOptions) -> ChannelOptions {
        let mut options = options.clone();
        options.serial = Self::serial_settings();
        options.default_port = sony_monitor_protocol::DEFAULT_TCP_PORT;
        options
    }

    /// # Errors
    ///
    /// Propagates the transport's open failure.
    pub async fn open(address: &str, options: &ChannelOptions) -> Result<Self> {
        let link =
            DeviceLink::open(Self::FAMILY_ID, address, &Self::channel_options(options)).await?;
        Ok(Self::from_link(link))
    }

    pub fn with_channel(address: impl Into<String>, channel: Channel, close_window: Duration) -> Self {
        Self::from_link(DeviceLink::with_channel(
            Self::FAMILY_ID,
            address,
            channel,
            close_window,
        ))
    }

    fn from_link(link: DeviceLink) -> Self {
        Self {
            descriptor: Self::descriptor(),
            link,
        }
    }

    async fn send(&self, command: CommandCode, arg0: Option<u8>) -> Result<()> {
        self.link.ensure_usable()?;
        let packet = encode_command(command, arg0, None, Address::BROADCAST, Address::BROADCAST)?;
        debug!(address = self.link.address(), %command, "sony command");
        self.link.write(&packet).await
    }
}

#[async_trait]
impl Driver for SonyDriver {
    fn descriptor(&self) -> &DriverDescriptor {
        &self.descriptor
    }

    fn address(&self) -> &str {
        self.link.address()
    }

    fn state(&self) -> DriverState {
        self.link.state()
    }

    async fn activate(&self, input: u32, _video: u32, _audio: u32) -> Result<()> {
        self.link.ensure_usable()?;
        let channel = byte_field("input", input)?;
        self.send(CommandCode::SET_CHANNEL, Some(channel)).await
    }

    async fn power_on(&self) -> Result<()> {
        self.send(CommandCode::POWER_ON, None).await
    }

    async fn power_off(&self) -> Result<()> {
        self.send(CommandCode::POWER_OFF, None).await
    }

    async fn close(&self) -> Result<()> {
        self.link.close().await
    }
}

/// Opens [`SonyDriver`]s for the registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct SonyFactory;

#[async_trait]
impl DriverFactory for SonyFactory {
    async fn open(&self, address: &str, options: &ChannelOptions) -> Result<Box<dyn Driver>> {
        Ok(Box::new(SonyDriver::open(address, options).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_override() {
        let options = SonyDriver::channel_options(&ChannelOptions::default());
        assert_eq!(options.serial.baud_rate, 38_400);
        assert_eq!(options.serial.parity, Parity::Odd);
        assert_eq!(options.serial.data_bits, DataBits::Eight);
        assert_eq!(options.serial.stop_bits, StopBits::One);
    }
}
