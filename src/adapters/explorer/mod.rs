//! Block Explorer Adapter
//!
//! Implements the `BalanceSource` port against an Esplora-compatible
//! REST API (Blockstream, mempool.space, self-hosted electrs).
//!
//! Sub-modules:
//! - `client`: HTTP client with request timeout
//! - `types`: API response type definitions

pub mod client;
pub mod types;

pub use client::{EsploraClient, EsploraClientConfig};
