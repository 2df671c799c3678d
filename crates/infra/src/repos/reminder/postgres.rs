use super::{IReminderRepo, ReminderRepoError};
use anyhow::Context;
use chrono::{DateTime, NaiveTime};
use chrono_tz::Tz;
use notifier_domain::{from_timestamp_millis, RecurrenceRule, Reminder, ReminderId};
use sqlx::{types::Json, FromRow, PgPool};
use std::convert::TryFrom;
use tracing::error;

pub struct PostgresReminderRepo {
    pool: PgPool,
}

impl PostgresReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderRaw {
    id: String,
    fire_at: i64,
    timezone: String,
    text: String,
    repeat: Option<Json<RecurrenceRule>>,
    time_of_day: Option<String>,
}

const TIME_OF_DAY_FORMAT: &str = "%H:%M:%S";

#[derive(Debug, FromRow)]
struct SequenceRaw {
    sequence: i64,
}

impl TryFrom<ReminderRaw> for Reminder {
    type Error = anyhow::Error;

    fn try_from(raw: ReminderRaw) -> anyhow::Result<Self> {
        let tz = raw
            .timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("Stored reminder {} has invalid timezone: {}", raw.id, e))?;
        let fire_at = from_timestamp_millis(&tz, raw.fire_at).with_context(|| {
            format!("Stored reminder {} has invalid fire_at: {}", raw.id, raw.fire_at)
        })?;
        let time_of_day = match raw.time_of_day.as_deref() {
            Some(time) => NaiveTime::parse_from_str(time, TIME_OF_DAY_FORMAT).with_context(|| {
                format!("Stored reminder {} has invalid time of day: {}", raw.id, time)
            })?,
            None => fire_at.time(),
        };
        Ok(Reminder::new(
            ReminderId::from(raw.id),
            fire_at,
            raw.text,
            raw.repeat.map(|repeat| repeat.0),
        )
        .with_time_of_day(time_of_day))
    }
}

fn into_reminders(raws: Vec<ReminderRaw>) -> Vec<Reminder> {
    raws.into_iter()
        .filter_map(|raw| match Reminder::try_from(raw) {
            Ok(reminder) => Some(reminder),
            Err(e) => {
                error!("Skipping unreadable reminder: {:?}", e);
                None
            }
        })
        .collect()
}

#[async_trait::async_trait]
impl IReminderRepo for PostgresReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> Result<(), ReminderRepoError> {
        let res = sqlx::query(
            r#"
            INSERT INTO reminders
            (id, fire_at, timezone, text, repeat, time_of_day)
            VALUES($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(reminder.id.as_str())
        .bind(reminder.fire_at_millis())
        .bind(reminder.fire_at.timezone().name())
        .bind(&reminder.text)
        .bind(reminder.repeat.as_ref().map(Json))
        .bind(reminder.time_of_day.format(TIME_OF_DAY_FORMAT).to_string())
        .execute(&self.pool)
        .await;

        match res {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(ReminderRepoError::DuplicateId(reminder.id.clone()))
            }
            Err(e) => Err(ReminderRepoError::Storage(e.into())),
        }
    }

    async fn find(&self, reminder_id: &ReminderId) -> Option<Reminder> {
        let raw = sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders AS r
            WHERE r.id = $1
            "#,
        )
        .bind(reminder_id.as_str())
        .fetch_optional(&self.pool)
        .await;

        match raw {
            Ok(raw) => raw.and_then(|raw| Reminder::try_from(raw).ok()),
            Err(e) => {
                error!("Unable to find reminder: {}. Err: {:?}", reminder_id, e);
                None
            }
        }
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Reminder>> {
        let raws = sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders AS r
            ORDER BY r.fire_at ASC, r.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(into_reminders(raws))
    }

    async fn find_due(&self, before_inc: i64) -> anyhow::Result<Vec<Reminder>> {
        let raws = sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders AS r
            WHERE r.fire_at <= $1
            ORDER BY r.fire_at ASC, r.id ASC
            "#,
        )
        .bind(before_inc)
        .fetch_all(&self.pool)
        .await?;
        Ok(into_reminders(raws))
    }

    async fn reschedule(
        &self,
        reminder_id: &ReminderId,
        fire_at: &DateTime<Tz>,
    ) -> Result<(), ReminderRepoError> {
        let res = sqlx::query(
            r#"
            UPDATE reminders
            SET fire_at = $2, timezone = $3
            WHERE id = $1
            "#,
        )
        .bind(reminder_id.as_str())
        .bind(fire_at.timestamp_millis())
        .bind(fire_at.timezone().name())
        .execute(&self.pool)
        .await
        .map_err(|e| ReminderRepoError::Storage(e.into()))?;

        if res.rows_affected() == 0 {
            return Err(ReminderRepoError::NotFound(reminder_id.clone()));
        }
        Ok(())
    }

    async fn delete(&self, reminder_id: &ReminderId) -> Result<Reminder, ReminderRepoError> {
        let raw = sqlx::query_as::<_, ReminderRaw>(
            r#"
            DELETE FROM reminders AS r
            WHERE r.id = $1
            RETURNING *
            "#,
        )
        .bind(reminder_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ReminderRepoError::Storage(e.into()))?;

        match raw {
            Some(raw) => Ok(Reminder::try_from(raw)?),
            None => Err(ReminderRepoError::NotFound(reminder_id.clone())),
        }
    }

    async fn next_sequence(&self, prefix: &str) -> anyhow::Result<u64> {
        let raw = sqlx::query_as::<_, SequenceRaw>(
            r#"
            INSERT INTO reminder_id_sequences AS s
                (prefix, next)
            VALUES
                ($1, 1)
            ON CONFLICT (prefix) DO UPDATE
                SET next = s.next + 1
            RETURNING s.next - 1 AS sequence
            "#,
        )
        .bind(prefix)
        .fetch_one(&self.pool)
        .await?;

        Ok(raw.sequence as u64)
    }
}
