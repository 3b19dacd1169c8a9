//! Command channel errors.
//!
//! These cover every transport a driver can talk through: serial ports,
//! raw TCP sockets and local (Unix domain / named pipe) sockets.

use crate::common::ErrorSeverity;

/// Transport-level failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    /// The address does not resolve to any supported transport.
    #[error("Unsupported device address '{address}': {reason}")]
    UnsupportedAddress {
        /// Address as given by the caller
        address: String,
        /// Why it was rejected
        reason: String,
    },

    /// The transport could not be opened.
    #[error("Failed to open {address}: {reason}")]
    Open {
        /// Address being opened
        address: String,
        /// Underlying failure
        reason: String,
    },

    /// The transport did not become ready within the open timeout.
    #[error("Timed out opening {address} after {timeout_ms}ms")]
    OpenTimeout {
        /// Address being opened
        address: String,
        /// Timeout in milliseconds
        timeout_ms: u64,
    },

    /// Bytes could not be written to the transport.
    #[error("Write to {address} failed: {reason}")]
    Write {
        /// Channel address
        address: String,
        /// Underlying failure
        reason: String,
    },

    /// Text could not be sent as single-byte ASCII.
    #[error("Cannot send non-ASCII text to {address}")]
    NonAsciiText {
        /// Channel address
        address: String,
    },

    /// The transport did not close cleanly and was force-released.
    #[error("Close of {address} failed: {reason}")]
    Close {
        /// Channel address
        address: String,
        /// Underlying failure
        reason: String,
    },
}

impl ChannelError {
    /// Get the error severity.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ChannelError::UnsupportedAddress { .. } => ErrorSeverity::Error,
            ChannelError::Open { .. } => ErrorSeverity::Error,
            ChannelError::OpenTimeout { .. } => ErrorSeverity::Warning,
            ChannelError::Write { .. } => ErrorSeverity::Error,
            ChannelError::NonAsciiText { .. } => ErrorSeverity::Error,
            ChannelError::Close { .. } => ErrorSeverity::Warning,
        }
    }

    /// True for failures that happened while establishing the link.
    pub fn is_open_failure(&self) -> bool {
        matches!(
            self,
            ChannelError::Open { .. } | ChannelError::OpenTimeout { .. }
        )
    }

    /// Create an unsupported-address error.
    pub fn unsupported(address: impl Into<String>, reason: impl Into<String>) -> Self {
        ChannelError::UnsupportedAddress {
            address: address.into(),
            reason: reason.into(),
        }
    }

    /// Create an open error.
    pub fn open(address: impl Into<String>, reason: impl ToString) -> Self {
        ChannelError::Open {
            address: address.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an open-timeout error.
    pub fn open_timeout(address: impl Into<String>, timeout_ms: u64) -> Self {
        ChannelError::OpenTimeout {
            address: address.into(),
            timeout_ms,
        }
    }

    /// Create a write error.
    pub fn write(address: impl Into<String>, reason: impl ToString) -> Self {
        ChannelError::Write {
            address: address.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a close error.
    pub fn close(address: impl Into<String>, reason: impl ToString) -> Self {
        ChannelError::Close {
            address: address.into(),
            reason: reason.to_string(),
        }
    }
}
