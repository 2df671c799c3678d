use super::INotificationChannel;
use notifier_domain::RecipientId;
use tracing::info;

/// Only logs deliveries. Used when no transport is configured.
pub struct LogNotificationChannel {}

impl LogNotificationChannel {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait::async_trait]
impl INotificationChannel for LogNotificationChannel {
    async fn send(&self, recipient: &RecipientId, text: &str) -> anyhow::Result<()> {
        info!(recipient = %recipient, "Delivering reminder: {}", text);
        Ok(())
    }
}
