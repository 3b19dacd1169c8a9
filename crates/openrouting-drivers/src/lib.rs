//! Device drivers for AV routing hardware.
//!
//! A [`DriverRegistry`] maps a stable family identifier to a factory that
//! opens a [`Driver`] handle for a device address. Every handle exposes the
//! same operations regardless of family:
//!
//! | Family | Identifier | Activate | Power |
//! |--------|------------|----------|-------|
//! | Extron SIS matrix | `extron-sis` | video and audio tie lines, one write | no-op |
//! | Tesla-class switch | `tesla-switch` | 6-byte select frame | no-op |
//! | Sony monitor | `sony-monitor` | `SET_CHANNEL` packet | `POWER_ON` / `POWER_OFF` packet |
//!
//! A handle owns its channel exclusively. Calls on one handle are serialized;
//! a channel fault moves it to [`DriverState::Failed`] and the caller loads a
//! new one.
//!
//! # Example
//!
//! ```no_run
//! use openrouting_drivers::prelude::*;
//!
//! # async fn run() -> openrouting_errors::Result<()> {
//! let registry = DriverRegistry::with_builtin_drivers(RegistryConfig::default());
//! let driver = registry.load("extron-sis", "ip:10.0.0.5").await?;
//! driver.activate(3, 1, 1).await?;
//! driver.close().await?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]

pub mod descriptor;
pub mod driver;
pub mod families;
pub mod link;
pub mod prelude;
pub mod registry;

pub use descriptor::{Capabilities, DriverDescriptor, DriverMetadata, FALLBACK_LOCALE};
pub use driver::{Driver, DriverState};
pub use families::{ExtronDriver, ExtronFactory, SonyDriver, SonyFactory, TeslaDriver, TeslaFactory};
pub use link::DeviceLink;
pub use registry::{DriverFactory, DriverRegistry, RegistryConfig};
