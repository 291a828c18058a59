//! Address balances in exact minor units.
//!
//! Explorers report cumulative funded/spent totals in satoshis. Balances
//! are kept as an integer satoshi count so that comparisons between polls
//! are exact; the BTC display value is derived with `rust_decimal` only
//! when a human reads it.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Minor units per display unit (satoshis per BTC).
pub const SATS_PER_BTC: u64 = 100_000_000;

/// Fractional digits shown for a display-unit amount.
pub const DISPLAY_SCALE: u32 = 8;

/// Display unit suffix.
pub const DISPLAY_UNIT: &str = "BTC";

/// Confirmed balance of an address, in satoshis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Balance(u64);

impl Balance {
    /// Zero balance.
    pub const ZERO: Self = Self(0);

    /// Wrap a raw satoshi count.
    #[must_use]
    pub const fn from_sats(sats: u64) -> Self {
        Self(sats)
    }

    /// Balance from explorer ledger totals.
    ///
    /// Returns `None` when `spent` exceeds `funded`, which no consistent
    /// ledger can report.
    #[must_use]
    pub const fn from_ledger(funded: u64, spent: u64) -> Option<Self> {
        match funded.checked_sub(spent) {
            Some(sats) => Some(Self(sats)),
            None => None,
        }
    }

    /// Raw satoshi count.
    #[must_use]
    pub const fn sats(self) -> u64 {
        self.0
    }

    /// Exact BTC value (scale 8).
    #[must_use]
    pub fn to_btc(self) -> Decimal {
        Decimal::from_i128_with_scale(i128::from(self.0), DISPLAY_SCALE)
    }

    /// Parse a BTC display string (e.g. `"1.50000000"`) back into satoshis.
    ///
    /// More than eight fractional digits, negative amounts and values
    /// beyond `u64` satoshis are rejected.
    pub fn parse_btc(s: &str) -> Result<Self, ParseBalanceError> {
        let value = Decimal::from_str(s.trim()).map_err(|_| ParseBalanceError(s.to_string()))?;
        if value.is_sign_negative() || value.scale() > DISPLAY_SCALE {
            return Err(ParseBalanceError(s.to_string()));
        }
        let sats = value
            .checked_mul(Decimal::from(SATS_PER_BTC))
            .map(|d| d.normalize())
            .filter(|d| d.scale() == 0)
            .and_then(|d| d.to_u64())
            .ok_or_else(|| ParseBalanceError(s.to_string()))?;
        Ok(Self(sats))
    }
}

/// Always eight fractional digits, no unit: `1.50000000`.
impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:08}",
            self.0 / SATS_PER_BTC,
            self.0 % SATS_PER_BTC
        )
    }
}

/// A display string that does not denote a satoshi amount.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a valid BTC amount")]
pub struct ParseBalanceError(String);

/// How a fresh observation relates to the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceChange {
    /// First successful read for the address.
    Baseline,
    /// Balance went up since the last read.
    Increased { previous: Balance },
    /// Balance went down since the last read.
    Decreased { previous: Balance },
    /// Same balance as the last read.
    Unchanged,
}

impl BalanceChange {
    /// Classify `current` against the last observed balance.
    #[must_use]
    pub fn classify(previous: Option<Balance>, current: Balance) -> Self {
        let Some(previous) = previous else {
            return Self::Baseline;
        };
        match current.cmp(&previous) {
            Ordering::Greater => Self::Increased { previous },
            Ordering::Less => Self::Decreased { previous },
            Ordering::Equal => Self::Unchanged,
        }
    }

    /// Whether this change warrants a notification.
    #[must_use]
    pub const fn is_notifiable(self) -> bool {
        matches!(self, Self::Increased { .. } | Self::Decreased { .. })
    }
}
