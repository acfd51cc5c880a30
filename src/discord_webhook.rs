use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::json;
use tracing::info;

use crate::error::Result;
use crate::webhook_notifier::WebhookNotifier;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Discord-style webhook: a POST with `{"content": "<message>"}` that
/// answers 204 on success.
#[derive(Debug, Clone)]
pub struct DiscordWebhook {
    url: String,
}

impl DiscordWebhook {
    pub fn new(url: String) -> DiscordWebhook {
        DiscordWebhook { url }
    }
}

impl WebhookNotifier for DiscordWebhook {
    async fn notify(&self, message: &str) -> Result<()> {
        let response = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()?
            .post(&self.url)
            .json(&json!({ "content": message }))
            .send()
            .await?;

        // Non-success statuses from the webhook are logged, not fatal.
        if response.status() == StatusCode::NO_CONTENT {
            info!("{message}");
        } else {
            info!(status = %response.status(), "{message}");
        }
        Ok(())
    }
}
