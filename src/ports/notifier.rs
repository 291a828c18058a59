//! Notifier Port - Single-Destination Delivery Interface
//!
//! One `NotificationEndpoint` is one configured destination (chat
//! channel, webhook, push topic). Fan-out across endpoints is the
//! dispatcher's job, not the endpoint's.

use async_trait::async_trait;

use crate::error::{DeliveryError, EndpointRegistrationError};

/// Trait for a single notification destination.
#[async_trait]
pub trait NotificationEndpoint: Send + Sync {
  /// Short, secret-free identifier for logs (e.g. `"tgram"`).
  fn name(&self) -> &str;

  /// Deliver one message. No retries.
  async fn deliver(&self, title: &str, body: &str) -> Result<(), DeliveryError>;
}

/// Builds endpoints from configuration strings.
///
/// The dispatcher only sees this trait; URL grammars live in adapters.
pub trait EndpointFactory: Send + Sync {
  /// Parse `raw` into an endpoint.
  fn create(&self, raw: &str) -> Result<Box<dyn NotificationEndpoint>, EndpointRegistrationError>;
}
