// Discord webhook sender. Outbound traffic is a bare webhook POST, so this
// deliberately exposes only the single call the core layer needs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::core::relay::{ChunkSender, RelayError};

/// Body of one webhook execution. Discord renders `content` as a normal
/// message from the webhook's identity.
#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
}

/// Posts relay chunks to a Discord webhook.
pub struct DiscordWebhookSender {
    client: Client,
    webhook_url: String,
}

impl DiscordWebhookSender {
    /// Build a sender with a per-request timeout. The timeout lives on the
    /// client so every delivery attempt gets the same deadline.
    pub fn new(webhook_url: String, timeout: Duration) -> Result<Self, RelayError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RelayError::Delivery(e.to_string()))?;

        Ok(Self {
            client,
            webhook_url,
        })
    }
}

#[async_trait]
impl ChunkSender for DiscordWebhookSender {
    async fn send(&self, content: &str) -> Result<(), RelayError> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&WebhookPayload { content })
            .send()
            .await
            .map_err(|e| RelayError::Delivery(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, "Discord webhook rejected chunk");
            return Err(RelayError::Delivery(format!(
                "Discord webhook returned {}: {}",
                status, body
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_serializes_to_content_field() {
        let payload = WebhookPayload { content: "hello" };
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, r#"{"content":"hello"}"#);
    }

    #[test]
    fn test_sender_builds_with_timeout() {
        let sender = DiscordWebhookSender::new(
            "https://discord.com/api/webhooks/1/token".to_string(),
            Duration::from_secs_f64(12.0),
        );
        assert!(sender.is_ok());
    }
}
