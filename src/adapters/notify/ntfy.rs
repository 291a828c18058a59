//! ntfy push endpoint.
//!
//! ntfy takes the message as a plain-text body and the title as a header,
//! so it does not fit the JSON webhook shape.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::error::DeliveryError;
use crate::ports::NotificationEndpoint;

/// Publishes to one ntfy topic.
#[derive(Debug)]
pub struct NtfyEndpoint {
  /// Configured scheme, `ntfy` or `ntfys`.
  name: &'static str,
  /// Topic URL, e.g. `https://ntfy.sh/my-wallets`.
  topic_url: Url,
  http: Client,
}

impl NtfyEndpoint {
  pub fn new(name: &'static str, topic_url: Url, http: Client) -> Self {
    Self {
      name,
      topic_url,
      http,
    }
  }
}

#[async_trait]
impl NotificationEndpoint for NtfyEndpoint {
  fn name(&self) -> &str {
    self.name
  }

  async fn deliver(&self, title: &str, body: &str) -> Result<(), DeliveryError> {
    let response = self
      .http
      .post(self.topic_url.clone())
      .header("Title", title)
      .body(body.to_string())
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

    debug!(status = status.as_u16(), "ntfy accepted message");
    Ok(())
  }
}
