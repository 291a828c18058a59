//! Esplora API response types.
//!
//! Only the fields the monitor reads are modelled; serde ignores the rest.

use serde::Deserialize;

use crate::domain::Balance;

/// `GET /address/{address}` response.
#[derive(Debug, Clone, Deserialize)]
pub struct AddressInfo {
  /// Address echoed back by the API.
  #[serde(default)]
  pub address: Option<String>,
  /// Confirmed on-chain totals.
  pub chain_stats: ChainStats,
}

/// Cumulative confirmed totals for an address, in satoshis.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ChainStats {
  /// Sum of all outputs ever paid to the address.
  pub funded_txo_sum: u64,
  /// Sum of those outputs already spent.
  pub spent_txo_sum: u64,
  /// Confirmed transaction count.
  #[serde(default)]
  pub tx_count: u64,
}

impl ChainStats {
  /// Confirmed balance, `None` for an inconsistent ledger.
  pub const fn balance(&self) -> Option<Balance> {
    Balance::from_ledger(self.funded_txo_sum, self.spent_txo_sum)
  }
}
