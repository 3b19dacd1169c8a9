//! Driver registry: family identifier to factory.
//!
//! The registry is a plain value built once at startup and then shared
//! read-only. Registration is append-only and the first entry for a family
//! stays active.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use openrouting_errors::{RegistryError, Result};
use openrouting_transport::ChannelOptions;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::descriptor::DriverDescriptor;
use crate::driver::Driver;
use crate::families::{
    ExtronDriver, ExtronFactory, SonyDriver, SonyFactory, TeslaDriver, TeslaFactory,
};

/// Opens a driver handle for one device family.
#[async_trait]
pub trait DriverFactory: Send + Sync {
    /// Open the channel for `address` and return a handle in the `Open`
    /// state. Nothing is written to the device.
    ///
    /// # Errors
    ///
    /// The transport's open failure.
    async fn open(&self, address: &str, options: &ChannelOptions) -> Result<Box<dyn Driver>>;
}

/// Settings the registry applies to every load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Open timeout in milliseconds; `None` waits as long as the transport does
    pub open_timeout_ms: Option<u64>,
    /// How long `close` waits for an in-flight operation and for the
    /// transport to shut down
    pub close_timeout_ms: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            open_timeout_ms: Some(10_000),
            close_timeout_ms: 2_000,
        }
    }
}

impl RegistryConfig {
    /// Base channel options for a load; families apply their own serial
    /// settings and TCP port on top.
    pub fn channel_options(&self) -> ChannelOptions {
        ChannelOptions::builder()
            .open_timeout(self.open_timeout_ms.map(Duration::from_millis))
            .close_timeout(Duration::from_millis(self.close_timeout_ms))
            .build()
    }
}

struct RegistryEntry {
    descriptor: DriverDescriptor,
    factory: Arc<dyn DriverFactory>,
}

/// Maps family identifiers to driver factories.
pub struct DriverRegistry {
    entries: Vec<RegistryEntry>,
    config: RegistryConfig,
}

impl DriverRegistry {
    /// An empty registry with default settings.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            entries: Vec::new(),
            config,
        }
    }

    /// A registry holding the Extron, Tesla and Sony families.
    pub fn with_builtin_drivers(config: RegistryConfig) -> Self {
        let mut registry = Self::with_config(config);
        let builtin: [(DriverDescriptor, Arc<dyn DriverFactory>); 3] = [
            (ExtronDriver::descriptor(), Arc::new(ExtronFactory)),
            (TeslaDriver::descriptor(), Arc::new(TeslaFactory)),
            (SonyDriver::descriptor(), Arc::new(SonyFactory)),
        ];
        for (descriptor, factory) in builtin {
            if let Err(err) = registry.register(descriptor, factory) {
                warn!(error = %err, "builtin driver skipped");
            }
        }
        registry
    }

    /// Register `factory` under `descriptor.family_id`.
    ///
    /// # Errors
    ///
    /// `DuplicateFamily` when the family is already registered; the existing
    /// entry stays active.
    pub fn register(
        &mut self,
        descriptor: DriverDescriptor,
        factory: Arc<dyn DriverFactory>,
    ) -> Result<()> {
        if self.contains(&descriptor.family_id) {
            return Err(RegistryError::duplicate_family(descriptor.family_id).into());
        }
        debug!(family = %descriptor.family_id, "driver registered");
        self.entries.push(RegistryEntry {
            descriptor,
            factory,
        });
        Ok(())
    }

    /// Descriptors in registration order.
    pub fn list(&self) -> Vec<DriverDescriptor> {
        self.entries.iter().map(|e| e.descriptor.clone()).collect()
    }

    pub fn descriptor(&self, family_id: &str) -> Option<&DriverDescriptor> {
        self.entry(family_id).map(|e| &e.descriptor)
    }

    pub fn contains(&self, family_id: &str) -> bool {
        self.entry(family_id).is_some()
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Open a driver for `family_id` at `address`.
    ///
    /// # Errors
    ///
    /// `UnknownFamily` when nothing is registered under `family_id` (no
    /// channel is opened), else the factory's open failure.
    pub async fn load(&self, family_id: &str, address: &str) -> Result<Box<dyn Driver>> {
        let entry = self
            .entry(family_id)
            .ok_or_else(|| RegistryError::unknown_family(family_id))?;
        let options = self.config.channel_options();
        let driver = entry.factory.open(address, &options).await?;
        info!(family = family_id, address, "driver loaded");
        Ok(driver)
    }

    fn entry(&self, family_id: &str) -> Option<&RegistryEntry> {
        self.entries
            .iter()
            .find(|e| e.descriptor.family_id == family_id)
    }
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Capabilities;

    #[test]
    fn test_builtin_families() {
        let registry = DriverRegistry::with_builtin_drivers(RegistryConfig::default());
        let ids: Vec<_> = registry.list().into_iter().map(|d| d.family_id).collect();
        assert_eq!(ids, ["extron-sis", "tesla-switch", "sony-monitor"]);
        assert!(registry.contains("sony-monitor"));
        assert!(!registry.contains("Sony-Monitor"));
    }

    #[test]
    fn test_config_channel_options() {
        let config = RegistryConfig {
            open_timeout_ms: None,
            close_timeout_ms: 250,
        };
        let options = config.channel_options();
        assert_eq!(options.open_timeout, None);
        assert_eq!(options.close_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_config_partial_deserialize() -> std::result::Result<(), serde_json::Error> {
        let config: RegistryConfig = serde_json::from_str(r#"{"close_timeout_ms": 500}"#)?;
        assert_eq!(config.open_timeout_ms, Some(10_000));
        assert_eq!(config.close_timeout_ms, 500);
        Ok(())
    }

    #[test]
    fn test_descriptor_lookup() {
        let mut registry = DriverRegistry::new();
        let descriptor = DriverDescriptor::new("custom", Capabilities::MULTIPLE_OUTPUTS);
        assert!(registry.register(descriptor, Arc::new(ExtronFactory)).is_ok());
        assert_eq!(
            registry.descriptor("custom").map(|d| d.capabilities),
            Some(Capabilities::MULTIPLE_OUTPUTS)
        );
        assert!(registry.descriptor("missing").is_none());
    }
}
