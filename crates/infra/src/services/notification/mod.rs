mod log;
mod telegram;
mod webhook;

pub use self::log::LogNotificationChannel;
pub use telegram::TelegramNotificationChannel;
pub use webhook::WebhookNotificationChannel;

use crate::config::NotificationChannelConfig;
use notifier_domain::RecipientId;
use std::sync::Arc;

/// Transport that delivers a reminder text to a single recipient.
/// Failures are per recipient and never affect other deliveries.
#[async_trait::async_trait]
pub trait INotificationChannel: Send + Sync {
    async fn send(&self, recipient: &RecipientId, text: &str) -> anyhow::Result<()>;
}

pub fn create_notification_channel(
    config: &NotificationChannelConfig,
) -> Arc<dyn INotificationChannel> {
    match config {
        NotificationChannelConfig::Log => Arc::new(LogNotificationChannel::new()),
        NotificationChannelConfig::Webhook { url, key } => {
            Arc::new(WebhookNotificationChannel::new(url.clone(), key.clone()))
        }
        NotificationChannelConfig::Telegram { bot_token } => {
            Arc::new(TelegramNotificationChannel::new(bot_token.clone()))
        }
    }
}
