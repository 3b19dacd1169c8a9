//! Tesla-class (TESmart-compatible) HDMI switches.

use std::time::Duration;

use async_trait::async_trait;
use openrouting_errors::Result;
use openrouting_transport::{Channel, ChannelOptions, SerialSettings};
use tesla_switch_protocol::encode_select_input;
use tracing::debug;

use super::PROVIDER;
use crate::descriptor::{Capabilities, DriverDescriptor, DriverMetadata};
use crate::driver::{Driver, DriverState};
use crate::link::DeviceLink;
use crate::registry::DriverFactory;

/// Driver for single-output switches selected with a 6-byte frame.
///
/// Video and audio follow the selected input together, so only `input` is
/// sent. There is no power command.
pub struct TeslaDriver {
    descriptor: DriverDescriptor,
    link: DeviceLink,
}

impl TeslaDriver {
    pub const FAMILY_ID: &'static str = "tesla-switch";

    pub fn descriptor() -> DriverDescriptor {
        DriverDescriptor::new(Self::FAMILY_ID, Capabilities::empty()).with_metadata(
            "en",
            DriverMetadata::new("TESmart-compatible HDMI switch", "TESmart", PROVIDER),
        )
    }

    pub fn channel_options(options: &ChannelOptions) -> ChannelOptions {
        let mut options = options.clone();
        options.serial = SerialSettings::new(tesla_switch_protocol::DEFAULT_BAUD_RATE);
        options.default_port = tesla_switch_protocol::DEFAULT_TCP_PORT;
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
}

#[async_trait]
impl Driver for TeslaDriver {
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
        let frame = encode_select_input(input)?;
        debug!(address = self.link.address(), input, "tesla select input");
        self.link.write(&frame).await
    }

    async fn power_on(&self) -> Result<()> {
        self.link.ensure_usable()
    }

    async fn power_off(&self) -> Result<()> {
        self.link.ensure_usable()
    }

    async fn close(&self) -> Result<()> {
        self.link.close().await
    }
}

/// Opens [`TeslaDriver`]s for the registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeslaFactory;

#[async_trait]
impl DriverFactory for TeslaFactory {
    async fn open(&self, address: &str, options: &ChannelOptions) -> Result<Box<dyn Driver>> {
        Ok(Box::new(TeslaDriver::open(address, options).await?))
    }
}
