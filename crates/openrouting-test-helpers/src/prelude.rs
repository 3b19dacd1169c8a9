//! Convenience re-exports for common test utilities.

pub use crate::must::{must, must_parse, must_some, must_with};

#[cfg(feature = "capture")]
pub use crate::must::must_async;

#[cfg(feature = "capture")]
pub use crate::capture::{DeviceCapture, capture_channel};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;
