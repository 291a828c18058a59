//! Watched address descriptors.

use serde::Deserialize;

/// One address to watch, as listed in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddressDescriptor {
    /// Address passed verbatim to the explorer.
    pub address: String,
    /// Human label. Falls back to the address itself.
    #[serde(default)]
    pub title: Option<String>,
}

impl AddressDescriptor {
    /// Descriptor without a label.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            title: None,
        }
    }

    /// Descriptor with a label.
    #[must_use]
    pub fn titled(address: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            title: Some(title.into()),
        }
    }

    /// Label used in logs and notification bodies.
    #[must_use]
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.address)
    }
}
