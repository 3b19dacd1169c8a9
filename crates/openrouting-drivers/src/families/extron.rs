//! Extron SIS-compatible matrix switchers.

use std::time::Duration;

use async_trait::async_trait;
use extron_sis_protocol::encode_tie;
use openrouting_errors::Result;
use openrouting_transport::{Channel, ChannelOptions, SerialSettings};
use tracing::debug;

use super::PROVIDER;
use crate::descriptor::{Capabilities, DriverDescriptor, DriverMetadata};
use crate::driver::{Driver, DriverState};
use crate::link::DeviceLink;
use crate::registry::DriverFactory;

/// Driver for switchers speaking the Extron SIS ASCII protocol.
///
/// A tie is sent as a video line followed by an audio line in a single
/// write. The protocol has no power command.
pub struct ExtronDriver {
    descriptor: DriverDescriptor,
    link: DeviceLink,
}

impl ExtronDriver {
    pub const FAMILY_ID: &'static str = "extron-sis";

    pub fn descriptor() -> DriverDescriptor {
        DriverDescriptor::new(
            Self::FAMILY_ID,
            Capabilities::MULTIPLE_OUTPUTS | Capabilities::DECOUPLED_AUDIO_OUTPUT,
        )
        .with_metadata(
            "en",
            DriverMetadata::new("Extron SIS-compatible matrix switch", "Extron", PROVIDER),
        )
    }

    /// `options` with the family's serial settings and TCP port applied.
    pub fn channel_options(options: &ChannelOptions) -> ChannelOptions {
        let mut options = options.clone();
        options.serial = SerialSettings::new(extron_sis_protocol::DEFAULT_BAUD_RATE);
        options.default_port = extron_sis_protocol::DEFAULT_TCP_PORT;
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

    /// Drive an already open channel.
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
impl Driver for ExtronDriver {
    fn descriptor(&self) -> &DriverDescriptor {
        &self.descriptor
    }

    fn address(&self) -> &str {
        self.link.address()
    }

    fn state(&self) -> DriverState {
        self.link.state()
    }

    async fn activate(&self, input: u32, video: u32, audio: u32) -> Result<()> {
        self.link.ensure_usable()?;
        let command = encode_tie(input, video, audio);
        debug!(address = self.link.address(), input, video, audio, "extron tie");
        self.link.write_text(&command).await
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

/// Opens [`ExtronDriver`]s for the registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtronFactory;

#[async_trait]
impl DriverFactory for ExtronFactory {
    async fn open(&self, address: &str, options: &ChannelOptions) -> Result<Box<dyn Driver>> {
        Ok(Box::new(ExtronDriver::open(address, options).await?))
    }
}
