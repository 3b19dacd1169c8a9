//! Static driver descriptions used for listing and lookup.

use std::collections::BTreeMap;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Optional routing capabilities of a device family.
    ///
    /// The bit values are stable and shared with the surrounding application.
    /// An empty set means the family routes one input to its output(s) with
    /// no further control.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Capabilities: u32 {
        /// More than one output can be routed independently
        const MULTIPLE_OUTPUTS       = 1 << 0;

        /// Audio can be routed to a different output than video
        const DECOUPLED_AUDIO_OUTPUT = 1 << 1;
    }
}

/// Locale used when a requested locale has no metadata.
pub const FALLBACK_LOCALE: &str = "en";

/// Human-readable metadata for one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverMetadata {
    pub title: String,
    pub manufacturer: String,
    pub provider: String,
}

impl DriverMetadata {
    pub fn new(
        title: impl Into<String>,
        manufacturer: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            manufacturer: manufacturer.into(),
            provider: provider.into(),
        }
    }
}

/// Immutable description of a device family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverDescriptor {
    pub family_id: String,
    pub capabilities: Capabilities,
    /// Locale tag to metadata
    pub metadata: BTreeMap<String, DriverMetadata>,
}

impl DriverDescriptor {
    pub fn new(family_id: impl Into<String>, capabilities: Capabilities) -> Self {
        Self {
            family_id: family_id.into(),
            capabilities,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, locale: impl Into<String>, metadata: DriverMetadata) -> Self {
        self.metadata.insert(locale.into(), metadata);
        self
    }

    pub fn has_capability(&self, capability: Capabilities) -> bool {
        self.capabilities.contains(capability)
    }

    /// Metadata for `locale`, falling back to [`FALLBACK_LOCALE`] and then to
    /// any available locale.
    pub fn metadata_for(&self, locale: &str) -> Option<&DriverMetadata> {
        self.metadata
            .get(locale)
            .or_else(|| self.metadata.get(FALLBACK_LOCALE))
            .or_else(|| self.metadata.values().next())
    }

    pub fn title_for(&self, locale: &str) -> Option<&str> {
        self.metadata_for(locale).map(|m| m.title.as_str())
    }
}
