//! Prelude module for convenient error handling imports.
//!
//! ```
//! use openrouting_errors::prelude::*;
//!
//! fn lookup(family: &str) -> Result<()> {
//!     Err(RegistryError::unknown_family(family).into())
//! }
//!
//! assert!(lookup("missing").is_err());
//! ```

pub use crate::{
    Result,
    channel::ChannelError,
    common::{ErrorCategory, ErrorSeverity, RoutingError},
    protocol::{ProtocolError, byte_field},
    registry::RegistryError,
};
