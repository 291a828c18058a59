//! Notification Dispatcher - Best-Effort Fan-Out
//!
//! Delivers each message to every registered endpoint, in registration
//! order. Delivery is at-most-once: no retries, no queueing. One failing
//! endpoint is logged and counted, never surfaced to the caller.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::config::ADDRESS_PLACEHOLDER;
use crate::domain::{Alert, AlertKind};
use crate::ports::{EndpointFactory, NotificationEndpoint};

/// Outcome of one `send` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
  /// Endpoints a delivery was attempted on.
  pub attempted: usize,
  /// Endpoints that accepted the message.
  pub delivered: usize,
  /// Endpoints that failed.
  pub failed: usize,
}

impl DispatchReport {
  /// True when no endpoint failed. An empty dispatch counts as success.
  pub const fn is_success(&self) -> bool {
    self.failed == 0
  }
}

/// Fans messages out to every configured endpoint.
pub struct NotificationDispatcher {
  /// Registered endpoints.
  endpoints: Vec<Box<dyn NotificationEndpoint>>,
  /// Builds endpoints from configuration strings.
  factory: Arc<dyn EndpointFactory>,
  /// Explorer page template with an `{address}` placeholder.
  link_template: Option<String>,
}

impl NotificationDispatcher {
  /// Create an empty dispatcher.
  pub fn new(factory: Arc<dyn EndpointFactory>) -> Self {
    Self {
      endpoints: Vec::new(),
      factory,
      link_template: None,
    }
  }

  /// Create a dispatcher and register every endpoint string.
  ///
  /// Strings that fail to register are logged and skipped.
  pub fn from_urls<I, S>(factory: Arc<dyn EndpointFactory>, urls: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let mut dispatcher = Self::new(factory);
    let mut configured = 0usize;
    for url in urls {
      configured += 1;
      dispatcher.add(url.as_ref());
    }

    if configured == 0 {
      warn!("No notification URLs configured, notifications will not be sent");
    } else {
      info!(
        configured,
        registered = dispatcher.len(),
        "Notification endpoints registered"
      );
    }

    dispatcher
  }

  /// Append explorer deep links built from `template`.
  #[must_use]
  pub fn with_link_template(mut self, template: impl Into<String>) -> Self {
    self.link_template = Some(template.into());
    self
  }

  /// Try to register one endpoint string.
  ///
  /// Returns `false` (after logging) if the string was rejected; other
  /// endpoints are unaffected.
  pub fn add(&mut self, raw: &str) -> bool {
    match self.factory.create(raw) {
      Ok(endpoint) => {
        debug!(endpoint = endpoint.name(), "Notification endpoint added");
        self.endpoints.push(endpoint);
        true
      }
      Err(e) => {
        warn!(
          error = %e,
          "Skipping notification URL, check the URL format and the service credentials"
        );
        false
      }
    }
  }

  /// Register an already-built endpoint.
  pub fn register(&mut self, endpoint: Box<dyn NotificationEndpoint>) {
    self.endpoints.push(endpoint);
  }

  /// Whether at least one endpoint is registered.
  pub fn has_endpoints(&self) -> bool {
    !self.endpoints.is_empty()
  }

  /// Number of registered endpoints.
  pub fn len(&self) -> usize {
    self.endpoints.len()
  }

  pub fn is_empty(&self) -> bool {
    self.endpoints.is_empty()
  }

  /// Explorer link for `address`, if a template is configured.
  pub fn link_for(&self, address: &str) -> Option<String> {
    self
      .link_template
      .as_deref()
      .map(|template| template.replace(ADDRESS_PLACEHOLDER, address))
  }

  /// Deliver a message to every endpoint.
  ///
  /// When `link_context` names an address and a link template is set,
  /// an explorer link is appended to the body. With no endpoints this
  /// is a no-op.
  pub async fn send(&self, title: &str, body: &str, link_context: Option<&str>) -> DispatchReport {
    let mut report = DispatchReport::default();
    if self.endpoints.is_empty() {
      return report;
    }

    let full_body = match link_context.and_then(|address| self.link_for(address)) {
      Some(link) => format!("{body}\n\nView on explorer: {link}"),
      None => body.to_string(),
    };

    for endpoint in &self.endpoints {
      report.attempted += 1;
      match endpoint.deliver(title, &full_body).await {
        Ok(()) => report.delivered += 1,
        Err(e) => {
          report.failed += 1;
          error!(
            endpoint = endpoint.name(),
            title,
            error = %e,
            "Failed to send notification"
          );
        }
      }
    }

    debug!(
      title,
      attempted = report.attempted,
      delivered = report.delivered,
      failed = report.failed,
      "Notification dispatched"
    );

    report
  }

  /// Deliver a domain alert, linking its address if it has one.
  pub async fn send_alert(&self, alert: &Alert) -> DispatchReport {
    self
      .send(alert.title(), &alert.body, alert.address.as_deref())
      .await
  }

  /// Send the synthetic test message.
  ///
  /// Returns `None` without sending when no endpoint is registered.
  pub async fn send_test(&self) -> Option<DispatchReport> {
    if !self.has_endpoints() {
      warn!("No notification URLs configured, cannot send test notification");
      return None;
    }

    info!(endpoints = self.len(), "Sending test notification");
    let report = self.send_alert(&Alert::test()).await;

    if report.is_success() {
      info!(delivered = report.delivered, "Test notification sent successfully");
    } else {
      error!(
        failed = report.failed,
        kind = %AlertKind::Test,
        "Failed to send test notification, check the notification URLs and network connectivity"
      );
    }

    Some(report)
  }
}

impl std::fmt::Debug for NotificationDispatcher {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let names: Vec<&str> = self.endpoints.iter().map(|e| e.name()).collect();
    f.debug_struct("NotificationDispatcher")
      .field("endpoints", &names)
      .field("link_template", &self.link_template)
      .finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use async_trait::async_trait;

  use super::*;
  use crate::error::{DeliveryError, EndpointRegistrationError};

  type Sent = Arc<Mutex<Vec<(String, String)>>>;

  /// Records deliveries, or fails every one.
  struct Recorder {
    name: String,
    sent: Sent,
    fail: bool,
  }

  #[async_trait]
  impl NotificationEndpoint for Recorder {
    fn name(&self) -> &str {
      &self.name
    }

    async fn deliver(&self, title: &str, body: &str) -> Result<(), DeliveryError> {
      if self.fail {
        return Err(DeliveryError::Status {
          status: 500,
          body: "boom".to_string(),
        });
      }
      self
        .sent
        .lock()
        .unwrap()
        .push((title.to_string(), body.to_string()));
      Ok(())
    }
  }

  /// Accepts `ok://<name>` and `fail://<name>`, rejects anything else.
  struct FakeFactory {
    sent: Sent,
  }

  impl EndpointFactory for FakeFactory {
    fn create(&self, raw: &str) -> Result<Box<dyn NotificationEndpoint>, EndpointRegistrationError> {
      let (scheme, name) = raw
        .split_once("://")
        .ok_or(url::ParseError::RelativeUrlWithoutBase)?;
      let fail = match scheme {
        "ok" => false,
        "fail" => true,
        other => return Err(EndpointRegistrationError::UnsupportedScheme(other.to_string())),
      };
      Ok(Box::new(Recorder {
        name: name.to_string(),
        sent: Arc::clone(&self.sent),
        fail,
      }))
    }
  }

  fn factory() -> (Arc<dyn EndpointFactory>, Sent) {
    let sent: Sent = Arc::default();
    let factory = Arc::new(FakeFactory {
      sent: Arc::clone(&sent),
    });
    (factory, sent)
  }

  #[test]
  fn test_bad_endpoint_does_not_block_others() {
    let (factory, sent) = factory();
    let dispatcher = NotificationDispatcher::from_urls(factory, ["ok://a", "garbage", "ok://b"]);

    assert_eq!(dispatcher.len(), 2);

    let report = tokio_test::block_on(dispatcher.send("T", "B", None));
    assert_eq!(report.delivered, 2);
    assert!(report.is_success());
    assert_eq!(sent.lock().unwrap().len(), 2);
  }

  #[test]
  fn test_add_reports_rejection() {
    let (factory, _) = factory();
    let mut dispatcher = NotificationDispatcher::new(factory);
    assert!(!dispatcher.add("smtp://nowhere"));
    assert!(dispatcher.add("ok://a"));
    assert!(dispatcher.has_endpoints());
  }

  #[tokio::test]
  async fn test_send_without_endpoints_is_noop() {
    let (factory, sent) = factory();
    let dispatcher = NotificationDispatcher::new(factory);

    let report = dispatcher.send("T", "B", Some("A")).await;
    assert_eq!(report, DispatchReport::default());
    assert!(report.is_success());
    assert!(sent.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_failed_endpoint_is_counted_not_raised() {
    let (factory, sent) = factory();
    let dispatcher = NotificationDispatcher::from_urls(factory, ["fail://x", "ok://y"]);

    let report = dispatcher.send("T", "B", None).await;
    assert_eq!(
      report,
      DispatchReport {
        attempted: 2,
        delivered: 1,
        failed: 1
      }
    );
    assert!(!report.is_success());
    assert_eq!(sent.lock().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn test_link_context_appends_explorer_link() {
    let (factory, sent) = factory();
    let dispatcher = NotificationDispatcher::from_urls(factory, ["ok://a"])
      .with_link_template("https://blockstream.info/address/{address}");

    dispatcher.send("T", "Body", Some("bc1qxyz")).await;
    dispatcher.send("T", "Plain", None).await;

    let sent = sent.lock().unwrap();
    assert_eq!(
      sent[0].1,
      "Body\n\nView on explorer: https://blockstream.info/address/bc1qxyz"
    );
    assert_eq!(sent[1].1, "Plain");
  }

  #[tokio::test]
  async fn test_send_test_without_endpoints() {
    let (factory, _) = factory();
    let dispatcher = NotificationDispatcher::new(factory);
    assert!(dispatcher.send_test().await.is_none());
  }

  #[tokio::test]
  async fn test_send_test_delivers_fixed_title() {
    let (factory, sent) = factory();
    let dispatcher = NotificationDispatcher::from_urls(factory, ["ok://a"]);

    let report = dispatcher.send_test().await.unwrap();
    assert!(report.is_success());
    assert_eq!(sent.lock().unwrap()[0].0, "Test Notification");
  }
}
