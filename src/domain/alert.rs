//! Notification messages emitted by the monitor.
//!
//! Titles are fixed per event kind so that downstream filters (mail rules,
//! chat keyword alerts) can match on them.

use std::fmt;

use super::address::AddressDescriptor;
use super::balance::{Balance, DISPLAY_UNIT};

/// Kind of event a notification reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertKind {
    FundsReceived,
    BalanceDecreased,
    MonitorError,
    Test,
}

impl AlertKind {
    /// Fixed notification title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::FundsReceived => "Funds Received",
            Self::BalanceDecreased => "Balance Decreased",
            Self::MonitorError => "Monitor Error",
            Self::Test => "Test Notification",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A ready-to-send notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub body: String,
    /// Address the alert concerns, used to build an explorer link.
    pub address: Option<String>,
}

impl Alert {
    #[must_use]
    pub const fn title(&self) -> &'static str {
        self.kind.title()
    }

    /// Balance went up.
    #[must_use]
    pub fn funds_received(item: &AddressDescriptor, previous: Balance, current: Balance) -> Self {
        Self {
            kind: AlertKind::FundsReceived,
            body: format!(
                "New funds received for {} ({})! Balance increased from {previous} to {current} {DISPLAY_UNIT}",
                item.label(),
                item.address,
            ),
            address: Some(item.address.clone()),
        }
    }

    /// Balance went down.
    #[must_use]
    pub fn balance_decreased(item: &AddressDescriptor, previous: Balance, current: Balance) -> Self {
        Self {
            kind: AlertKind::BalanceDecreased,
            body: format!(
                "Balance decreased for {} ({})! Now {current} {DISPLAY_UNIT} (was {previous} {DISPLAY_UNIT})",
                item.label(),
                item.address,
            ),
            address: Some(item.address.clone()),
        }
    }

    /// Balance could not be fetched.
    #[must_use]
    pub fn monitor_error(item: &AddressDescriptor, detail: &dyn fmt::Display) -> Self {
        Self {
            kind: AlertKind::MonitorError,
            body: format!("Error monitoring {} ({}): {detail}", item.label(), item.address),
            address: Some(item.address.clone()),
        }
    }

    /// Synthetic message for `--test-notifications`.
    #[must_use]
    pub fn test() -> Self {
        Self {
            kind: AlertKind::Test,
            body: format!(
                "This is a test notification from your Bitcoin address monitor (sent {}).",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
            ),
            address: None,
        }
    }
}
