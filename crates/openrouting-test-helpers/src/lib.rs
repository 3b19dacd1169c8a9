//! Shared test utilities for OpenRouting.
//!
//! # Modules
//!
//! - [`mod@must`] - Unwrap helpers with good error messages and `#[track_caller]`
//! - [`capture`] - In-memory device end of a [`Channel`](openrouting_transport::Channel)
//! - [`prelude`] - Convenience re-exports
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! openrouting-test-helpers = { workspace = true }
//! ```
//!
//! ```rust,ignore
//! use openrouting_test_helpers::prelude::*;
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![allow(clippy::unwrap_used, clippy::panic)]

pub mod must;
pub mod prelude;

#[cfg(feature = "capture")]
pub mod capture;

pub use must::*;
