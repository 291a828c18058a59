//! Notification Endpoint Adapters
//!
//! Turns apprise-style endpoint URLs into `NotificationEndpoint`
//! implementations. Supported schemes:
//!
//! | scheme               | destination                                  |
//! |----------------------|----------------------------------------------|
//! | `json://`, `jsons://`| generic JSON webhook at `http(s)://host/path`|
//! | `discord://id/token` | Discord webhook                              |
//! | `slack://A/B/C`      | Slack incoming webhook                       |
//! | `tgram://token/chat` | Telegram bot `sendMessage`                   |
//! | `ntfy://`, `ntfys://`| ntfy topic (`ntfy.sh` when no host is given) |
//!
//! Endpoint URLs carry credentials, so errors and logs name the scheme
//! only.

pub mod ntfy;
pub mod payload;
pub mod webhook;

use std::time::Duration;

use anyhow::Context;
use reqwest::Client;
use url::Url;

pub use ntfy::NtfyEndpoint;
pub use payload::{DiscordPayload, GenericJsonPayload, PayloadBuilder, SlackPayload, TelegramPayload};
pub use webhook::WebhookEndpoint;

use crate::error::EndpointRegistrationError;
use crate::ports::{EndpointFactory, NotificationEndpoint};

const DISCORD_API: &str = "https://discord.com/api/webhooks";
const SLACK_HOOKS: &str = "https://hooks.slack.com/services";
const TELEGRAM_API: &str = "https://api.telegram.org";
const NTFY_DEFAULT_HOST: &str = "ntfy.sh";

/// Timeout applied to every notification request.
pub const DEFAULT_NOTIFY_TIMEOUT: Duration = Duration::from_secs(15);

/// Build the HTTP client shared by all endpoints.
pub fn build_http_client(timeout: Duration) -> anyhow::Result<Client> {
  Client::builder()
    .timeout(timeout)
    .build()
    .context("Failed to build notification HTTP client")
}

/// `EndpointFactory` for apprise-style URLs, sharing one HTTP client.
#[derive(Debug, Clone)]
pub struct UrlEndpointFactory {
  http: Client,
}

impl UrlEndpointFactory {
  pub fn new(http: Client) -> Self {
    Self { http }
  }

  /// Factory with its own client and the default notification timeout.
  pub fn with_default_client() -> anyhow::Result<Self> {
    Ok(Self::new(build_http_client(DEFAULT_NOTIFY_TIMEOUT)?))
  }
}

impl EndpointFactory for UrlEndpointFactory {
  fn create(&self, raw: &str) -> Result<Box<dyn NotificationEndpoint>, EndpointRegistrationError> {
    parse_endpoint(raw, &self.http)
  }
}

/// Parse one endpoint URL into a ready-to-use endpoint.
///
/// # Errors
/// Returns `EndpointRegistrationError` for an unknown scheme, a URL that
/// does not parse, or a missing token/topic.
pub fn parse_endpoint(
  raw: &str,
  http: &Client,
) -> Result<Box<dyn NotificationEndpoint>, EndpointRegistrationError> {
  let raw = raw.trim();
  let (scheme, rest) = raw
    .split_once("://")
    .ok_or(url::ParseError::RelativeUrlWithoutBase)?;

  match scheme.to_ascii_lowercase().as_str() {
    "json" => json_endpoint("json", "http", rest, http),
    "jsons" => json_endpoint("jsons", "https", rest, http),
    "discord" => discord_endpoint(rest, http),
    "slack" => slack_endpoint(rest, http),
    "tgram" => telegram_endpoint(rest, http),
    "ntfy" => ntfy_endpoint("ntfy", "http", rest, http),
    "ntfys" => ntfy_endpoint("ntfys", "https", rest, http),
    other => Err(EndpointRegistrationError::UnsupportedScheme(other.to_string())),
  }
}

/// Non-empty `/`-separated segments of the part after `scheme://`,
/// ignoring any query string.
fn segments(rest: &str) -> Vec<&str> {
  let path = rest.split(['?', '#']).next().unwrap_or_default();
  path.split('/').filter(|s| !s.is_empty()).collect()
}

fn json_endpoint(
  scheme: &'static str,
  transport: &str,
  rest: &str,
  http: &Client,
) -> Result<Box<dyn NotificationEndpoint>, EndpointRegistrationError> {
  let url = Url::parse(&format!("{transport}://{rest}"))?;
  if url.host_str().is_none_or(str::is_empty) {
    return Err(EndpointRegistrationError::Missing {
      scheme,
      what: "a host",
    });
  }
  Ok(Box::new(WebhookEndpoint::new(
    scheme,
    url,
    Box::new(GenericJsonPayload),
    http.clone(),
  )))
}

fn discord_endpoint(
  rest: &str,
  http: &Client,
) -> Result<Box<dyn NotificationEndpoint>, EndpointRegistrationError> {
  let parts = segments(rest);
  let [id, token, ..] = parts[..] else {
    return Err(EndpointRegistrationError::Missing {
      scheme: "discord",
      what: "a webhook id and token",
    });
  };
  let url = Url::parse(&format!("{DISCORD_API}/{id}/{token}"))?;
  Ok(Box::new(WebhookEndpoint::new(
    "discord",
    url,
    Box::new(DiscordPayload),
    http.clone(),
  )))
}

fn slack_endpoint(
  rest: &str,
  http: &Client,
) -> Result<Box<dyn NotificationEndpoint>, EndpointRegistrationError> {
  let parts = segments(rest);
  let [a, b, c, ..] = parts[..] else {
    return Err(EndpointRegistrationError::Missing {
      scheme: "slack",
      what: "three webhook tokens",
    });
  };
  let url = Url::parse(&format!("{SLACK_HOOKS}/{a}/{b}/{c}"))?;
  Ok(Box::new(WebhookEndpoint::new(
    "slack",
    url,
    Box::new(SlackPayload),
    http.clone(),
  )))
}

fn telegram_endpoint(
  rest: &str,
  http: &Client,
) -> Result<Box<dyn NotificationEndpoint>, EndpointRegistrationError> {
  let parts = segments(rest);
  let Some(&token) = parts.first() else {
    return Err(EndpointRegistrationError::Missing {
      scheme: "tgram",
      what: "a bot token",
    });
  };
  let Some(&chat_id) = parts.get(1) else {
    return Err(EndpointRegistrationError::Missing {
      scheme: "tgram",
      what: "a chat id",
    });
  };
  let url = Url::parse(&format!("{TELEGRAM_API}/bot{token}/sendMessage"))?;
  Ok(Box::new(WebhookEndpoint::new(
    "tgram",
    url,
    Box::new(TelegramPayload {
      chat_id: chat_id.to_string(),
    }),
    http.clone(),
  )))
}

fn ntfy_endpoint(
  scheme: &'static str,
  transport: &str,
  rest: &str,
  http: &Client,
) -> Result<Box<dyn NotificationEndpoint>, EndpointRegistrationError> {
  let parts = segments(rest);
  let url = match parts[..] {
    [] => {
      return Err(EndpointRegistrationError::Missing {
        scheme,
        what: "a topic",
      });
    }
    // Bare topic: the public server, always over TLS.
    [topic] => Url::parse(&format!("https://{NTFY_DEFAULT_HOST}/{topic}"))?,
    _ => Url::parse(&format!("{transport}://{}", parts.join("/")))?,
  };
  Ok(Box::new(NtfyEndpoint::new(scheme, url, http.clone())))
}
