use super::INotificationChannel;
use anyhow::bail;
use notifier_domain::RecipientId;
use reqwest::Client;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReminderDeliveryDTO<'a> {
    recipient_id: &'a RecipientId,
    text: &'a str,
}

/// Posts every delivery to a configured webhook
pub struct WebhookNotificationChannel {
    client: Client,
    url: String,
    key: Option<String>,
}

impl WebhookNotificationChannel {
    pub fn new(url: String, key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            url,
            key,
        }
    }
}

#[async_trait::async_trait]
impl INotificationChannel for WebhookNotificationChannel {
    async fn send(&self, recipient: &RecipientId, text: &str) -> anyhow::Result<()> {
        let mut req = self.client.post(&self.url).json(&ReminderDeliveryDTO {
            recipient_id: recipient,
            text,
        });
        if let Some(key) = &self.key {
            req = req.header("notifier-webhook-key", key);
        }
        let res = req.send().await?;
        if !res.status().is_success() {
            bail!(
                "Webhook responded with status: {} for recipient: {}",
                res.status(),
                recipient
            );
        }
        Ok(())
    }
}
