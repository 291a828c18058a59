//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.json`, validating all parameters,
//! and providing clear error messages for misconfiguration.
//!
//! The address list is deliberately not checked here: the
//! `--test-notifications` path runs with an empty list, so the
//! non-empty requirement is enforced when the monitor is built.

use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use url::Url;

use super::{MonitorConfig, ADDRESS_PLACEHOLDER};
use crate::error::ConfigError;

/// Load and validate configuration from a JSON file.
///
/// # Errors
/// Returns a `ConfigError` if:
/// - File doesn't exist or can't be read
/// - JSON parsing fails
/// - Validation rules are violated
pub fn load_config(path: impl AsRef<Path>) -> Result<MonitorConfig, ConfigError> {
  let path = path.as_ref();

  let content = std::fs::read_to_string(path).map_err(|source| match source.kind() {
    ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
    _ => ConfigError::Read {
      path: path.to_path_buf(),
      source,
    },
  })?;

  parse_config(&content)
}

/// Parse and validate a configuration document.
pub fn parse_config(content: &str) -> Result<MonitorConfig, ConfigError> {
  let config: MonitorConfig = serde_json::from_str(content)?;
  validate_config(&config)?;
  Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Positive, finite polling interval that fits a `Duration`
/// - Positive request timeout
/// - Parsable explorer API URL
/// - Address page template containing `{address}`
/// - No blank address entries
fn validate_config(config: &MonitorConfig) -> Result<(), ConfigError> {
  ensure(
    config.interval.is_finite() && config.interval > 0.0,
    format!("interval must be a positive number of seconds, got {}", config.interval),
  )?;
  ensure(
    Duration::try_from_secs_f64(config.interval).is_ok(),
    format!("interval {} is too large", config.interval),
  )?;

  ensure(
    config.explorer.timeout_seconds > 0,
    "explorer.timeout_seconds must be positive",
  )?;

  Url::parse(&config.explorer.api_base_url).map_err(|e| {
    ConfigError::Invalid(format!(
      "explorer.api_base_url '{}' is not a valid URL: {e}",
      config.explorer.api_base_url
    ))
  })?;

  ensure(
    config.explorer.address_url.contains(ADDRESS_PLACEHOLDER),
    format!("explorer.address_url must contain {ADDRESS_PLACEHOLDER}"),
  )?;

  for (i, item) in config.addresses.iter().enumerate() {
    ensure(
      !item.address.trim().is_empty(),
      format!("address #{i} is empty"),
    )?;
  }

  Ok(())
}

fn ensure(condition: bool, message: impl Into<String>) -> Result<(), ConfigError> {
  if condition {
    Ok(())
  } else {
    Err(ConfigError::Invalid(message.into()))
  }
}
