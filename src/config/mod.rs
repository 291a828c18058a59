//! Configuration Module - JSON-based Monitor Configuration
//!
//! Loads and validates configuration from `config.json`. The file is
//! read once at startup and treated as read-only for the process
//! lifetime; there is no hot-reload.

pub mod loader;

use std::time::Duration;

use serde::Deserialize;

use crate::domain::AddressDescriptor;

/// Top-level monitor configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
  /// Addresses to watch, polled in this order.
  #[serde(default)]
  pub addresses: Vec<AddressDescriptor>,
  /// Seconds to sleep between rounds.
  #[serde(default = "default_interval")]
  pub interval: f64,
  /// Also notify when a balance cannot be fetched.
  #[serde(default)]
  pub notify_errors: bool,
  /// Notification endpoint URLs (apprise-style syntax).
  #[serde(default, alias = "notification_endpoints")]
  pub apprise_urls: Vec<String>,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
  /// Log line format.
  #[serde(default)]
  pub log_format: LogFormat,
  /// Block explorer endpoints.
  #[serde(default)]
  pub explorer: ExplorerConfig,
}

impl MonitorConfig {
  /// Sleep between rounds.
  ///
  /// Only meaningful once the loader has checked the interval is a
  /// positive finite number.
  pub fn interval(&self) -> Duration {
    Duration::from_secs_f64(self.interval)
  }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
  /// Human-readable lines.
  #[default]
  Pretty,
  /// One JSON object per line.
  Json,
}

/// Block explorer configuration.
///
/// Defaults target the public Blockstream Esplora instance.
#[derive(Debug, Clone, Deserialize)]
pub struct ExplorerConfig {
  /// REST API root; `/address/{address}` is appended.
  #[serde(default = "default_api_base_url")]
  pub api_base_url: String,
  /// Human-facing page for an address; `{address}` is substituted.
  #[serde(default = "default_address_url")]
  pub address_url: String,
  /// Request timeout in seconds.
  #[serde(default = "default_timeout")]
  pub timeout_seconds: u64,
}

impl Default for ExplorerConfig {
  fn default() -> Self {
    Self {
      api_base_url: default_api_base_url(),
      address_url: default_address_url(),
      timeout_seconds: default_timeout(),
    }
  }
}

impl ExplorerConfig {
  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_seconds)
  }
}

/// Placeholder substituted in `address_url`.
pub const ADDRESS_PLACEHOLDER: &str = "{address}";

// Default value functions for serde

fn default_interval() -> f64 {
  60.0
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_api_base_url() -> String {
  "https://blockstream.info/api".to_string()
}

fn default_address_url() -> String {
  "https://blockstream.info/address/{address}".to_string()
}

fn default_timeout() -> u64 {
  30
}
