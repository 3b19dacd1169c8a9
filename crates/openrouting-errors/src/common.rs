//! Top-level error type and classification shared by every OpenRouting crate.

use core::fmt;

use crate::{ChannelError, ProtocolError, RegistryError};

/// Top-level error that wraps every OpenRouting sub-error.
///
/// Operations on a driver handle (`activate`, `power_on`, `power_off`,
/// `close`) and registry lookups all return this type.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    /// Registry errors
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Command channel errors
    #[error("Transport error: {0}")]
    Channel(#[from] ChannelError),

    /// Wire-format errors
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Operation issued after the driver was closed
    #[error("Driver {family} at {address} is closed")]
    DriverClosed {
        /// Device family identifier
        family: String,
        /// Address the driver was opened with
        address: String,
    },

    /// Operation issued after the driver lost its channel
    #[error("Driver {family} at {address} has failed and must be reopened: {reason}")]
    DriverFailed {
        /// Device family identifier
        family: String,
        /// Address the driver was opened with
        address: String,
        /// Fault that moved the driver to the failed state
        reason: String,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RoutingError {
    /// Get the error category for classification.
    pub fn category(&self) -> ErrorCategory {
        match self {
            RoutingError::Registry(_) => ErrorCategory::Registry,
            RoutingError::Channel(_) => ErrorCategory::Transport,
            RoutingError::Protocol(_) => ErrorCategory::Protocol,
            RoutingError::DriverClosed { .. } | RoutingError::DriverFailed { .. } => {
                ErrorCategory::Driver
            }
            RoutingError::Config(_) => ErrorCategory::Config,
        }
    }

    /// Get the error severity level.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RoutingError::Registry(e) => e.severity(),
            RoutingError::Channel(e) => e.severity(),
            RoutingError::Protocol(e) => e.severity(),
            RoutingError::DriverClosed { .. } => ErrorSeverity::Warning,
            RoutingError::DriverFailed { .. } => ErrorSeverity::Critical,
            RoutingError::Config(_) => ErrorSeverity::Error,
        }
    }

    /// True when the driver handle is unusable and has to be reopened.
    pub fn requires_reopen(&self) -> bool {
        matches!(
            self,
            RoutingError::DriverClosed { .. } | RoutingError::DriverFailed { .. }
        )
    }

    /// Create a driver-closed error.
    pub fn driver_closed(family: impl Into<String>, address: impl Into<String>) -> Self {
        RoutingError::DriverClosed {
            family: family.into(),
            address: address.into(),
        }
    }

    /// Create a driver-failed error.
    pub fn driver_failed(
        family: impl Into<String>,
        address: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        RoutingError::DriverFailed {
            family: family.into(),
            address: address.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error with a message.
    pub fn config(msg: impl Into<String>) -> Self {
        RoutingError::Config(msg.into())
    }
}

/// Error category for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCategory {
    /// Driver registration and lookup
    Registry = 0,
    /// Serial, TCP and local-socket transports
    Transport = 1,
    /// Wire-format encode/decode
    Protocol = 2,
    /// Driver lifecycle
    Driver = 3,
    /// Configuration errors
    Config = 4,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Registry => write!(f, "Registry"),
            ErrorCategory::Transport => write!(f, "Transport"),
            ErrorCategory::Protocol => write!(f, "Protocol"),
            ErrorCategory::Driver => write!(f, "Driver"),
            ErrorCategory::Config => write!(f, "Config"),
        }
    }
}

/// Error severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ErrorSeverity {
    /// Informational, no action required
    Info = 0,
    /// Warning, may require attention
    Warning = 1,
    /// Error, operation failed
    Error = 2,
    /// Critical, the device link is gone
    Critical = 3,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
