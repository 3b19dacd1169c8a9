//! Common imports for driver users.

pub use crate::{
    descriptor::{Capabilities, DriverDescriptor, DriverMetadata},
    driver::{Driver, DriverState},
    registry::{DriverFactory, DriverRegistry, RegistryConfig},
};
pub use openrouting_errors::{Result, RoutingError};
