use crate::discord_webhook::DiscordWebhook;
use crate::error::Result;

pub trait WebhookNotifier {
    async fn notify(&self, message: &str) -> Result<()>;
}

#[derive(Debug, Clone)]
pub enum WebhookNotifierType {
    DiscordWebhook(DiscordWebhook),
}

impl WebhookNotifierType {
    pub async fn notify(&self, message: &str) -> Result<()> {
        match self {
            WebhookNotifierType::DiscordWebhook(webhook) => webhook.notify(message).await,
        }
    }
}
