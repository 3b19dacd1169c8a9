//! Centralized error types for OpenRouting
//!
//! Every crate in the workspace reports failures through the types defined
//! here, so the surrounding application can show the specific reason a routing
//! command failed instead of a generic message.
//!
//! # Architecture
//!
//! - [`common`]: the top-level [`RoutingError`] plus severity and category
//! - [`registry`]: driver registration and lookup errors
//! - [`channel`]: command channel (serial, TCP, local socket) errors
//! - [`protocol`]: wire-format encode/decode errors shared by all codecs
//!
//! # Example
//!
//! ```
//! use openrouting_errors::prelude::*;
//!
//! fn encode_input(input: u32) -> Result<u8> {
//!     u8::try_from(input).map_err(|_overflow| ProtocolError::encode("input", input, 255).into())
//! }
//!
//! assert!(encode_input(300).is_err());
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod channel;
pub mod common;
pub mod prelude;
pub mod protocol;
pub mod registry;

pub use channel::ChannelError;
pub use common::{ErrorCategory, ErrorSeverity, RoutingError};
pub use protocol::ProtocolError;
pub use registry::RegistryError;

/// A specialized `Result` type for OpenRouting operations.
pub type Result<T> = std::result::Result<T, RoutingError>;
