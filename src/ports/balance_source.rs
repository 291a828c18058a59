//! Balance Source Port - Remote Balance Lookup Interface
//!
//! Defines the trait for reading the current confirmed balance of an
//! address from an external ledger (block explorer REST API).

use async_trait::async_trait;

use crate::domain::Balance;
use crate::error::FetchError;

/// Trait for confirmed-balance providers.
///
/// Every call is a fresh lookup; implementors must not cache. A failed
/// lookup is reported, never retried here: the next poll round is the
/// retry.
#[async_trait]
pub trait BalanceSource: Send + Sync + 'static {
  /// Current confirmed balance of `address`.
  async fn get_balance(&self, address: &str) -> Result<Balance, FetchError>;
}
