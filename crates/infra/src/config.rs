use chrono_tz::Tz;
use notifier_domain::RecipientId;
use notifier_utils::create_random_secret;
use std::str::FromStr;
use tracing::{info, warn};

/// Where reminder notifications are delivered
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationChannelConfig {
    /// Only writes deliveries to the log
    Log,
    /// POSTs every delivery to an HTTP endpoint
    Webhook { url: String, key: Option<String> },
    /// Sends every delivery as a Telegram bot message
    Telegram { bot_token: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Secret used to administrate reminders through the `x-api-key` header
    pub admin_api_key: String,
    /// Secret the external trigger has to provide to start due processing
    pub trigger_secret: String,
    /// Port for the application to run on
    pub port: usize,
    /// Timezone all wall-clock times given by administrators are interpreted in
    pub timezone: Tz,
    /// Recipients that are always authorized
    pub admin_ids: Vec<RecipientId>,
    /// Initial set of allowed recipients. More can be granted at runtime.
    pub allowed_users: Vec<RecipientId>,
    /// Interval of the internal due processing timer. Zero disables the timer,
    /// leaving due processing to the external trigger.
    pub poll_interval_secs: u64,
    /// Maximum time to wait for a single recipient delivery
    pub delivery_timeout_millis: u64,
    /// Maximum duration of one due processing run. Reminders not reached in
    /// time stay due and are picked up by the next run.
    pub process_due_deadline_secs: u64,
    pub notification_channel: NotificationChannelConfig,
}

fn secret_from_env(name: &str) -> String {
    match std::env::var(name) {
        Ok(secret) if !secret.is_empty() => secret,
        _ => {
            info!(
                "Did not find {} environment variable. Going to create one.",
                name
            );
            let secret = create_random_secret(32);
            info!("{} was generated and set to: {}", name, secret);
            secret
        }
    }
}

fn parse_env<T: FromStr + ToString>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(value) => match value.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}.",
                    name,
                    value,
                    default.to_string()
                );
                default
            }
        },
        Err(_) => default,
    }
}

/// Parses a list of recipient ids given either as `1,2,3` or as a json array `[1, 2, 3]`
pub fn parse_recipient_list(value: &str) -> Vec<RecipientId> {
    let value = value.trim();
    if value.starts_with('[') {
        return match serde_json::from_str::<Vec<serde_json::Value>>(value) {
            Ok(ids) => ids
                .into_iter()
                .filter_map(|id| match id {
                    serde_json::Value::Number(n) => Some(RecipientId::new(n.to_string())),
                    serde_json::Value::String(s) if !s.trim().is_empty() => {
                        Some(RecipientId::new(s.trim()))
                    }
                    _ => None,
                })
                .collect(),
            Err(_) => {
                warn!("Malformed recipient list: {}, ignoring it.", value);
                Vec::new()
            }
        };
    }
    value
        .split(',')
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .map(RecipientId::new)
        .collect()
}

fn recipients_from_env(name: &str) -> Vec<RecipientId> {
    std::env::var(name)
        .map(|value| parse_recipient_list(&value))
        .unwrap_or_default()
}

fn timezone_from_env() -> Tz {
    let default_timezone = Tz::UTC;
    match std::env::var("TIMEZONE") {
        Ok(tzid) => match tzid.trim().parse::<Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                warn!(
                    "The given TIMEZONE: {} is not a valid IANA timezone, falling back to: {}.",
                    tzid, default_timezone
                );
                default_timezone
            }
        },
        Err(_) => default_timezone,
    }
}

fn notification_channel_from_env() -> NotificationChannelConfig {
    let channel = std::env::var("NOTIFICATION_CHANNEL").unwrap_or_else(|_| "log".into());
    match channel.trim().to_lowercase().as_str() {
        "webhook" => match std::env::var("WEBHOOK_URL") {
            Ok(url) if !url.is_empty() => NotificationChannelConfig::Webhook {
                url,
                key: std::env::var("WEBHOOK_KEY").ok(),
            },
            _ => {
                warn!("NOTIFICATION_CHANNEL is webhook but WEBHOOK_URL is missing, notifications will only be logged.");
                NotificationChannelConfig::Log
            }
        },
        "telegram" => match std::env::var("TELEGRAM_BOT_TOKEN") {
            Ok(bot_token) if !bot_token.is_empty() => {
                NotificationChannelConfig::Telegram { bot_token }
            }
            _ => {
                warn!("NOTIFICATION_CHANNEL is telegram but TELEGRAM_BOT_TOKEN is missing, notifications will only be logged.");
                NotificationChannelConfig::Log
            }
        },
        "log" => NotificationChannelConfig::Log,
        other => {
            warn!(
                "Unknown NOTIFICATION_CHANNEL: {}, notifications will only be logged.",
                other
            );
            NotificationChannelConfig::Log
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            admin_api_key: secret_from_env("ADMIN_API_KEY"),
            trigger_secret: secret_from_env("TRIGGER_SECRET"),
            port: parse_env("PORT", 5000),
            timezone: timezone_from_env(),
            admin_ids: recipients_from_env("ADMIN_IDS"),
            allowed_users: recipients_from_env("ALLOWED_USERS"),
            poll_interval_secs: parse_env("REMINDERS_POLL_INTERVAL_SECS", 15),
            delivery_timeout_millis: parse_env("DELIVERY_TIMEOUT_MILLIS", 1000 * 10),
            process_due_deadline_secs: parse_env("PROCESS_DUE_DEADLINE_SECS", 50),
            notification_channel: notification_channel_from_env(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
