mod inmemory;
mod postgres;

pub use inmemory::InMemoryReminderRepo;
pub use postgres::PostgresReminderRepo;

use chrono::DateTime;
use chrono_tz::Tz;
use notifier_domain::{Reminder, ReminderId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReminderRepoError {
    #[error("Reminder with id: {0} was not found")]
    NotFound(ReminderId),
    #[error("A reminder with id: {0} already exists")]
    DuplicateId(ReminderId),
    #[error("Reminder storage failed: {0}")]
    Storage(#[from] anyhow::Error),
}

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    /// Fails with `DuplicateId` when a reminder with the same id is stored
    async fn insert(&self, reminder: &Reminder) -> Result<(), ReminderRepoError>;
    async fn find(&self, reminder_id: &ReminderId) -> Option<Reminder>;
    /// All reminders ordered by `fire_at` ascending
    async fn find_all(&self) -> anyhow::Result<Vec<Reminder>>;
    /// Every reminder firing at or before `before_inc`, ordered by `fire_at` ascending
    async fn find_due(&self, before_inc: i64) -> anyhow::Result<Vec<Reminder>>;
    async fn reschedule(
        &self,
        reminder_id: &ReminderId,
        fire_at: &DateTime<Tz>,
    ) -> Result<(), ReminderRepoError>;
    async fn delete(&self, reminder_id: &ReminderId) -> Result<Reminder, ReminderRepoError>;
    /// Allocates the next ordinal for ids sharing the given prefix. Ordinals are
    /// never handed out twice, also not after the reminder holding it is deleted.
    async fn next_sequence(&self, prefix: &str) -> anyhow::Result<u64>;
}

fn sort_by_fire_at(reminders: &mut [Reminder]) {
    reminders.sort_by(|r1, r2| {
        r1.fire_at_millis()
            .cmp(&r2.fire_at_millis())
            .then_with(|| r1.id.cmp(&r2.id))
    });
}
