//! JSON webhook endpoint.
//!
//! Shared by every channel that takes a JSON POST: the generic `json://`
//! webhook, Discord, Slack and Telegram differ only in URL and payload.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::payload::PayloadBuilder;
use crate::error::DeliveryError;
use crate::ports::NotificationEndpoint;

/// Endpoint that POSTs a JSON payload to a fixed URL.
pub struct WebhookEndpoint {
  /// Scheme the endpoint was configured with.
  name: &'static str,
  /// Delivery URL. May embed a secret token, never logged.
  url: Url,
  /// Channel-specific body.
  builder: Box<dyn PayloadBuilder>,
  /// Shared HTTP client.
  http: Client,
}

impl WebhookEndpoint {
  pub fn new(
    name: &'static str,
    url: Url,
    builder: Box<dyn PayloadBuilder>,
    http: Client,
  ) -> Self {
    Self {
      name,
      url,
      builder,
      http,
    }
  }
}

impl std::fmt::Debug for WebhookEndpoint {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("WebhookEndpoint")
      .field("name", &self.name)
      .finish_non_exhaustive()
  }
}

#[async_trait]
impl NotificationEndpoint for WebhookEndpoint {
  fn name(&self) -> &str {
    self.name
  }

  async fn deliver(&self, title: &str, body: &str) -> Result<(), DeliveryError> {
    let payload = self.builder.build_payload(title, body);

    let response = self
      .http
      .post(self.url.clone())
      .json(&payload)
      .send()
      .await?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(DeliveryError::Status {
        status: status.as_u16(),
        body,
      });
    }

    debug!(endpoint = self.name, status = status.as_u16(), "Webhook accepted message");
    Ok(())
  }
}
