//! Channel-specific JSON payloads.
//!
//! Each webhook-style service expects the title and body in its own shape.
//! Builders are pure so they can be tested without a network.

use serde_json::json;

/// Trait for building a webhook request body.
pub trait PayloadBuilder: Send + Sync {
  /// Build the JSON body for one message.
  fn build_payload(&self, title: &str, body: &str) -> serde_json::Value;
}

/// Generic JSON webhook (`json://`), apprise-compatible field names.
pub struct GenericJsonPayload;

impl PayloadBuilder for GenericJsonPayload {
  fn build_payload(&self, title: &str, body: &str) -> serde_json::Value {
    json!({
      "version": "1.0",
      "title": title,
      "message": body,
      "type": "info"
    })
  }
}

/// Discord incoming webhook.
pub struct DiscordPayload;

impl PayloadBuilder for DiscordPayload {
  fn build_payload(&self, title: &str, body: &str) -> serde_json::Value {
    json!({
      "content": format!("**{title}**\n\n{body}")
    })
  }
}

/// Slack incoming webhook.
pub struct SlackPayload;

impl PayloadBuilder for SlackPayload {
  fn build_payload(&self, title: &str, body: &str) -> serde_json::Value {
    json!({
      "blocks": [
        {
          "type": "section",
          "text": {
            "type": "mrkdwn",
            "text": format!("*{title}*\n\n{body}")
          }
        }
      ]
    })
  }
}

/// Telegram Bot API `sendMessage`.
pub struct TelegramPayload {
  pub chat_id: String,
}

impl TelegramPayload {
  /// Escape the three characters Telegram's HTML mode reserves.
  fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
      match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        _ => out.push(c),
      }
    }
    out
  }
}

impl PayloadBuilder for TelegramPayload {
  fn build_payload(&self, title: &str, body: &str) -> serde_json::Value {
    json!({
      "chat_id": self.chat_id,
      "text": format!("<b>{}</b>\n\n{}", Self::escape_html(title), Self::escape_html(body)),
      "parse_mode": "HTML",
      "disable_web_page_preview": true
    })
  }
}
