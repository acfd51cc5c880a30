use std::path::Path;

use inquire::{Confirm, Text};
use tracing::{debug, info, warn};

use crate::config::{CloudflareConfig, Config};
use crate::discord_webhook::DiscordWebhook;
use crate::dns_provider::{DnsProvider, UpdateRequest};
use crate::domain::split_domain;
use crate::error::{Error, Result};
use crate::ip_handler::get_current_ip;
use crate::webhook_notifier::WebhookNotifierType;

pub struct CLIProgram<T>
where
    T: DnsProvider,
{
    config: Config,
    api: T,
    webhooks: Vec<WebhookNotifierType>,
}

impl<T> CLIProgram<T>
where
    T: DnsProvider,
{
    pub fn new(api: T, config: Config) -> CLIProgram<T> {
        let mut webhooks = Vec::new();
        if config.webhook.is_empty() {
            warn!("no webhook configured, outcomes will only be logged");
        } else {
            webhooks.push(WebhookNotifierType::DiscordWebhook(DiscordWebhook::new(
                config.webhook.clone(),
            )));
        }
        CLIProgram {
            config,
            api,
            webhooks,
        }
    }

    /// One sync run: fetch the current public IP, look up the published A
    /// record and update it if the two differ.
    pub async fn sync(&self, force: bool) -> Result<()> {
        let domain = &self.config.cloudflare.domain;
        info!(%domain, "checking for new ip");

        let current_ip = get_current_ip(&self.config.return_ip).await?;
        debug!(ip = %current_ip, "fetched public ip");

        let parts = split_domain(domain)?;
        debug!(prefix = %parts.prefix, apex = %parts.apex, "split domain");
        let zone = self.api.find_zone(&parts.apex).await?;
        let fqdn = parts.fqdn();
        let record = self.api.find_record(&zone.id, &fqdn).await?;
        info!(published = %record.content, observed = %current_ip, "comparing record content");

        if record.content == current_ip {
            if !force {
                info!("ip has not changed, doing nothing");
                self.notify(&format!(
                    "No DNS update needed, {domain} already points at {current_ip}"
                ))
                .await;
                return Ok(());
            }
            info!("ip has not changed but force flag set, updating record anyway");
        }

        let update = UpdateRequest::a_record(&fqdn, &current_ip);
        match self.api.update_record(&zone.id, &record.id, &update).await {
            Ok(()) => {
                info!(%domain, ip = %current_ip, "record updated");
                self.notify(&format!("Updated DNS record {domain} to {current_ip}"))
                    .await;
                Ok(())
            }
            Err(e) => {
                // Failed updates reach the webhook too, then abort the run.
                self.notify(&format!("Failed to update DNS record {domain}: {e}"))
                    .await;
                Err(e)
            }
        }
    }

    async fn notify(&self, message: &str) {
        for webhook in &self.webhooks {
            if let Err(e) = webhook.notify(message).await {
                warn!("webhook notification failed: {e}");
            }
        }
    }
}

/// Interactively scaffold a config file at `path`.
pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        let overwrite = Confirm::new(&format!("{path:?} already exists, overwrite it?"))
            .with_default(false)
            .prompt()
            .map_err(|e| Error::Config(format!("prompt failed: {e}")))?;
        if !overwrite {
            info!("keeping existing config");
            return Ok(());
        }
    }

    let return_ip = Text::new("Endpoint that returns your public IP")
        .with_default("https://api.ipify.org")
        .prompt()
        .map_err(|e| Error::Config(format!("prompt failed: {e}")))?;
    let webhook = Text::new("Webhook URL for outcome notifications")
        .prompt()
        .map_err(|e| Error::Config(format!("prompt failed: {e}")))?;
    let api_token = Text::new("Cloudflare API token")
        .prompt()
        .map_err(|e| Error::Config(format!("prompt failed: {e}")))?;
    let domain = Text::new("Domain to keep in sync (e.g. home.example.com)")
        .prompt()
        .map_err(|e| Error::Config(format!("prompt failed: {e}")))?;
    // Catch a malformed domain now instead of on the first sync.
    split_domain(&domain)?;

    let config = Config {
        return_ip,
        webhook,
        cloudflare: CloudflareConfig { api_token, domain },
    };
    config.write(path)?;
    info!("wrote config to {path:?}");
    Ok(())
}
