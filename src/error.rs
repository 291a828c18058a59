//! Error Types - Startup, Fetch and Delivery Failures
//!
//! Only `ConfigError` is fatal, and only at startup. Every other error
//! is recovered where it happens: fetch failures are logged per address,
//! registration and delivery failures are logged per endpoint.

use std::path::PathBuf;

use thiserror::Error;

/// Configuration could not be loaded or is unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// The config file does not exist.
  #[error("configuration file '{}' not found", .0.display())]
  NotFound(PathBuf),

  /// The config file exists but could not be read.
  #[error("failed to read configuration file '{}': {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The config file is not valid JSON for the expected schema.
  #[error("error parsing configuration file: {0}")]
  Parse(#[from] serde_json::Error),

  /// A field holds a value outside its accepted range.
  #[error("invalid configuration: {0}")]
  Invalid(String),

  /// The monitor was asked to start with nothing to watch.
  #[error("no addresses found in the configuration file, please add at least one address")]
  NoAddresses,
}

/// Failure to obtain a balance for one address.
#[derive(Debug, Error)]
pub enum FetchError {
  /// Connection-level failure (DNS, refused, TLS, reset).
  #[error("request failed: {0}")]
  Request(#[source] reqwest::Error),

  /// The request did not complete within the configured timeout.
  #[error("request timed out")]
  Timeout,

  /// The explorer answered with a non-success status.
  #[error("explorer returned HTTP {status}")]
  Status { status: u16 },

  /// The body did not carry the expected ledger totals.
  #[error("malformed explorer response: {0}")]
  MalformedResponse(String),
}

impl From<reqwest::Error> for FetchError {
  fn from(err: reqwest::Error) -> Self {
    if err.is_timeout() {
      Self::Timeout
    } else if err.is_decode() {
      Self::MalformedResponse(err.to_string())
    } else if let Some(status) = err.status() {
      Self::Status {
        status: status.as_u16(),
      }
    } else {
      Self::Request(err)
    }
  }
}

/// An endpoint string could not be turned into a notification endpoint.
#[derive(Debug, Error)]
pub enum EndpointRegistrationError {
  #[error("endpoint is not a valid URL: {0}")]
  InvalidUrl(#[from] url::ParseError),

  #[error("unsupported notification scheme '{0}'")]
  UnsupportedScheme(String),

  #[error("{scheme}:// endpoint is missing {what}")]
  Missing { scheme: &'static str, what: &'static str },
}

/// Delivery to a single endpoint failed.
#[derive(Debug, Error)]
pub enum DeliveryError {
  /// Transport failure. The request URL is stripped: endpoint URLs carry
  /// tokens.
  #[error("request failed: {0}")]
  Request(#[source] reqwest::Error),

  #[error("endpoint returned HTTP {status}: {body}")]
  Status { status: u16, body: String },
}

impl From<reqwest::Error> for DeliveryError {
  fn from(err: reqwest::Error) -> Self {
    Self::Request(err.without_url())
  }
}
