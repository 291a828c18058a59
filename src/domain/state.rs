//! Per-address memory of the last observed balance.

use std::collections::HashMap;

use super::address::AddressDescriptor;
use super::balance::Balance;

/// Last successful observation per address.
///
/// Every configured address starts unobserved. Duplicate addresses in the
/// configuration share one slot.
#[derive(Debug, Clone, Default)]
pub struct AddressState {
    last_balances: HashMap<String, Option<Balance>>,
}

impl AddressState {
    /// Seed an unobserved slot for every configured address.
    #[must_use]
    pub fn new(addresses: &[AddressDescriptor]) -> Self {
        let last_balances = addresses
            .iter()
            .map(|item| (item.address.clone(), None))
            .collect();
        Self { last_balances }
    }

    /// Last observed balance, `None` while unobserved or unknown.
    #[must_use]
    pub fn get(&self, address: &str) -> Option<Balance> {
        self.last_balances.get(address).copied().flatten()
    }

    /// Record a successful observation.
    pub fn set(&mut self, address: &str, balance: Balance) {
        self.last_balances.insert(address.to_string(), Some(balance));
    }

    /// Whether a baseline has been recorded for the address.
    #[must_use]
    pub fn is_observed(&self, address: &str) -> bool {
        self.get(address).is_some()
    }

    /// Number of tracked address slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.last_balances.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.last_balances.is_empty()
    }
}
