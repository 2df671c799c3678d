use super::{sort_by_fire_at, IReminderRepo, ReminderRepoError};
use crate::repos::shared::inmemory_repo::*;
use chrono::DateTime;
use chrono_tz::Tz;
use notifier_domain::{Reminder, ReminderId};
use std::collections::HashMap;
use std::sync::Mutex;

pub struct InMemoryReminderRepo {
    reminders: Mutex<Vec<Reminder>>,
    sequences: Mutex<HashMap<String, u64>>,
}

impl InMemoryReminderRepo {
    pub fn new() -> Self {
        Self {
            reminders: Mutex::new(vec![]),
            sequences: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> Result<(), ReminderRepoError> {
        if insert_unique(reminder, &self.reminders) {
            Ok(())
        } else {
            Err(ReminderRepoError::DuplicateId(reminder.id.clone()))
        }
    }

    async fn find(&self, reminder_id: &ReminderId) -> Option<Reminder> {
        find(reminder_id, &self.reminders)
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Reminder>> {
        let mut reminders = find_by(&self.reminders, |_| true);
        sort_by_fire_at(&mut reminders);
        Ok(reminders)
    }

    async fn find_due(&self, before_inc: i64) -> anyhow::Result<Vec<Reminder>> {
        let mut reminders = find_by(&self.reminders, |reminder| reminder.is_due(before_inc));
        sort_by_fire_at(&mut reminders);
        Ok(reminders)
    }

    async fn reschedule(
        &self,
        reminder_id: &ReminderId,
        fire_at: &DateTime<Tz>,
    ) -> Result<(), ReminderRepoError> {
        let found = update(reminder_id, &self.reminders, |reminder| {
            reminder.fire_at = *fire_at;
        });
        if found {
            Ok(())
        } else {
            Err(ReminderRepoError::NotFound(reminder_id.clone()))
        }
    }

    async fn delete(&self, reminder_id: &ReminderId) -> Result<Reminder, ReminderRepoError> {
        delete(reminder_id, &self.reminders)
            .ok_or_else(|| ReminderRepoError::NotFound(reminder_id.clone()))
    }

    async fn next_sequence(&self, prefix: &str) -> anyhow::Result<u64> {
        let mut sequences = self.sequences.lock().unwrap();
        let next = match sequences.get(prefix) {
            Some(next) => *next,
            // Seed from reminders that were inserted with externally allocated ids
            None => find_by(&self.reminders, |_| true)
                .iter()
                .filter_map(|reminder| reminder.id.sequence_for(prefix))
                .max()
                .map(|max| max + 1)
                .unwrap_or(0),
        };
        sequences.insert(prefix.to_string(), next + 1);
        Ok(next)
    }
}
