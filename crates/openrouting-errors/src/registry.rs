//! Driver registry errors.

use crate::common::ErrorSeverity;

/// Errors raised while registering or resolving a device family.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A driver for this family identifier is already registered.
    ///
    /// Registration happens once at startup, so this is a programming error
    /// rather than a runtime condition.
    #[error("Device family '{0}' is already registered")]
    DuplicateFamily(String),

    /// No driver is registered under this family identifier.
    #[error("Unknown device family '{0}'")]
    UnknownFamily(String),
}

impl RegistryError {
    /// Get the error severity.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RegistryError::DuplicateFamily(_) => ErrorSeverity::Critical,
            RegistryError::UnknownFamily(_) => ErrorSeverity::Error,
        }
    }

    /// Create a duplicate-family error.
    pub fn duplicate_family(family: impl Into<String>) -> Self {
        RegistryError::DuplicateFamily(family.into())
    }

    /// Create an unknown-family error.
    pub fn unknown_family(family: impl Into<String>) -> Self {
        RegistryError::UnknownFamily(family.into())
    }
}
