//! Built-in device families.

pub mod extron;
pub mod sony;
pub mod tesla;

pub use extron::{ExtronDriver, ExtronFactory};
pub use sony::{SonyDriver, SonyFactory};
pub use tesla::{TeslaDriver, TeslaFactory};

/// Provider named in the metadata of the built-in drivers.
pub(crate) const PROVIDER: &str = "OpenRouting";
