//! Esplora HTTP Client - Confirmed Balance Lookups
//!
//! Wraps reqwest with a request timeout. One GET per lookup, no retries,
//! no caching: a failure surfaces to the monitor, which tries again on
//! the next round.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use super::types::AddressInfo;
use crate::config::ExplorerConfig;
use crate::domain::Balance;
use crate::error::FetchError;
use crate::ports::BalanceSource;

/// Configuration for the Esplora HTTP client.
#[derive(Debug, Clone)]
pub struct EsploraClientConfig {
  /// API root, e.g. `https://blockstream.info/api`.
  pub base_url: String,
  /// Request timeout.
  pub timeout: Duration,
}

impl Default for EsploraClientConfig {
  fn default() -> Self {
    Self {
      base_url: "https://blockstream.info/api".to_string(),
      timeout: Duration::from_secs(30),
    }
  }
}

impl From<&ExplorerConfig> for EsploraClientConfig {
  fn from(config: &ExplorerConfig) -> Self {
    Self {
      base_url: config.api_base_url.clone(),
      timeout: config.timeout(),
    }
  }
}

/// Balance source backed by an Esplora REST API.
#[derive(Debug, Clone)]
pub struct EsploraClient {
  /// Underlying HTTP client.
  http: Client,
  /// Parsed API root.
  base_url: Url,
}

impl EsploraClient {
  /// Create a new Esplora client.
  pub fn new(config: EsploraClientConfig) -> Result<Self> {
    let base_url = Url::parse(&config.base_url)
      .with_context(|| format!("Invalid explorer API URL: {}", config.base_url))?;

    let http = Client::builder()
      .timeout(config.timeout)
      .user_agent(concat!("btc-balance-monitor/", env!("CARGO_PKG_VERSION")))
      .build()
      .context("Failed to build HTTP client")?;

    Ok(Self { http, base_url })
  }

  /// `{base}/address/{address}`, with the address percent-encoded as a
  /// single path segment.
  pub fn address_url(&self, address: &str) -> Url {
    let mut url = self.base_url.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
      segments.pop_if_empty().push("address").push(address);
    }
    url
  }
}

#[async_trait]
impl BalanceSource for EsploraClient {
  #[instrument(skip(self), level = "debug")]
  async fn get_balance(&self, address: &str) -> Result<Balance, FetchError> {
    let url = self.address_url(address);

    let response = self.http.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
      return Err(FetchError::Status {
        status: status.as_u16(),
      });
    }

    let body = response.text().await?;
    let info: AddressInfo = serde_json::from_str(&body)
      .map_err(|e| FetchError::MalformedResponse(e.to_string()))?;

    let balance = info.chain_stats.balance().ok_or_else(|| {
      FetchError::MalformedResponse(format!(
        "spent_txo_sum {} exceeds funded_txo_sum {}",
        info.chain_stats.spent_txo_sum, info.chain_stats.funded_txo_sum
      ))
    })?;

    debug!(
      sats = balance.sats(),
      tx_count = info.chain_stats.tx_count,
      "Fetched confirmed balance"
    );

    Ok(balance)
  }
}
