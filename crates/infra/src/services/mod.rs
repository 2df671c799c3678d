mod notification;
mod recipients;

pub use notification::{
    create_notification_channel, INotificationChannel, LogNotificationChannel,
    TelegramNotificationChannel, WebhookNotificationChannel,
};
pub use recipients::{IRecipientResolver, RecipientRegistry};
