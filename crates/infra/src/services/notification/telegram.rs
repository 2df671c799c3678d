use super::INotificationChannel;
use anyhow::bail;
use notifier_domain::RecipientId;
use reqwest::Client;
use serde::Serialize;

const TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: String,
}

fn format_message(text: &str) -> String {
    format!("🔔 Reminder:\n{}", text)
}

/// Delivers reminders as Telegram bot messages, the recipient id being the chat id
pub struct TelegramNotificationChannel {
    client: Client,
    send_message_url: String,
}

impl TelegramNotificationChannel {
    pub fn new(bot_token: String) -> Self {
        Self {
            client: Client::new(),
            send_message_url: format!("{}/bot{}/sendMessage", TELEGRAM_API_URL, bot_token),
        }
    }
}

#[async_trait::async_trait]
impl INotificationChannel for TelegramNotificationChannel {
    async fn send(&self, recipient: &RecipientId, text: &str) -> anyhow::Result<()> {
        let res = self
            .client
            .post(&self.send_message_url)
            .json(&SendMessageRequest {
                chat_id: recipient.as_str(),
                text: format_message(text),
            })
            .send()
            .await?;
        if !res.status().is_success() {
            bail!(
                "Telegram responded with status: {} for chat: {}",
                res.status(),
                recipient
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_reminder_text() {
        assert_eq!(format_message("standup"), "🔔 Reminder:\nstandup");
    }
}
