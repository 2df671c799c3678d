use crate::error::NotifierError;
use crate::shared::{
    auth::protect_trigger_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use futures::future::join_all;
use notifier_api_structs::process_due_reminders::*;
use notifier_domain::{RecipientId, Reminder};
use notifier_infra::{Config, NotifierContext, ReminderRepoError};
use std::time::Duration;
use tokio::time::{timeout, Instant};
use tracing::{error, info, warn};

pub async fn process_due_reminders_controller(
    http_req: HttpRequest,
    ctx: web::Data<NotifierContext>,
) -> Result<HttpResponse, NotifierError> {
    protect_trigger_route(&http_req, &ctx)?;

    let usecase = ProcessDueRemindersUseCase::new(&ctx.config);

    execute(usecase, &ctx)
        .await
        .map(|summary| {
            HttpResponse::Ok().json(APIResponse {
                processed: summary.processed,
                delivery_failures: summary.delivery_failures,
                store_failures: summary.store_failures,
                deferred: summary.deferred,
            })
        })
        .map_err(NotifierError::from)
}

/// Delivers every reminder that is due and then reschedules recurring reminders
/// or retires one-time reminders.
///
/// Reminders are handled one at a time and a failure only affects the reminder
/// at hand. The state of a reminder is only written after its delivery was
/// attempted, so a reminder whose write fails stays due and is delivered again
/// by the next run.
#[derive(Debug)]
pub struct ProcessDueRemindersUseCase {
    /// Maximum time to wait for the delivery to a single recipient
    pub delivery_timeout: Duration,
    /// Reminders not reached within this duration stay due for the next run
    pub deadline: Duration,
}

impl ProcessDueRemindersUseCase {
    pub fn new(config: &Config) -> Self {
        Self {
            delivery_timeout: Duration::from_millis(config.delivery_timeout_millis),
            deadline: Duration::from_secs(config.process_due_deadline_secs),
        }
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct ProcessDueSummary {
    pub processed: usize,
    pub delivery_failures: usize,
    pub store_failures: usize,
    pub deferred: usize,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for NotifierError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

/// Returns the number of recipients the reminder could not be delivered to
async fn deliver(
    reminder: &Reminder,
    recipients: &[RecipientId],
    delivery_timeout: Duration,
    ctx: &NotifierContext,
) -> usize {
    let deliveries = recipients.iter().map(|recipient| async move {
        match timeout(
            delivery_timeout,
            ctx.notifications.send(recipient, &reminder.text),
        )
        .await
        {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                warn!(
                    reminder = %reminder.id,
                    recipient = %recipient,
                    "Unable to deliver reminder: {:?}",
                    e
                );
                false
            }
            Err(_) => {
                warn!(
                    reminder = %reminder.id,
                    recipient = %recipient,
                    "Delivery of reminder timed out after {:?}",
                    delivery_timeout
                );
                false
            }
        }
    });

    join_all(deliveries)
        .await
        .into_iter()
        .filter(|delivered| !delivered)
        .count()
}

async fn reschedule_or_retire(
    reminder: &Reminder,
    ctx: &NotifierContext,
) -> Result<(), ReminderRepoError> {
    let res = match reminder.next_fire_at() {
        Some(next_fire_at) => {
            ctx.repos
                .reminders
                .reschedule(&reminder.id, &next_fire_at)
                .await
        }
        None => ctx.repos.reminders.delete(&reminder.id).await.map(|_| ()),
    };

    match res {
        // Removed by an administrator while it was being delivered
        Err(ReminderRepoError::NotFound(id)) => {
            info!("Reminder: {} was already removed", id);
            Ok(())
        }
        res => res,
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for ProcessDueRemindersUseCase {
    type Response = ProcessDueSummary;

    type Error = UseCaseError;

    const NAME: &'static str = "ProcessDueReminders";

    async fn execute(&mut self, ctx: &NotifierContext) -> Result<Self::Response, Self::Error> {
        let _single_flight = ctx.due_processing_lock.lock().await;
        let started_at = Instant::now();

        let now = ctx.sys.get_timestamp_millis();
        let due = ctx.repos.reminders.find_due(now).await.map_err(|e| {
            error!("Unable to find due reminders: {:?}", e);
            UseCaseError::StorageError
        })?;

        let mut summary = ProcessDueSummary::default();
        for (i, reminder) in due.iter().enumerate() {
            if started_at.elapsed() >= self.deadline {
                summary.deferred = due.len() - i;
                warn!(
                    "Due processing deadline of {:?} exceeded, {} reminders are deferred to the next run",
                    self.deadline, summary.deferred
                );
                break;
            }

            let recipients = ctx.recipients.current_recipients();
            summary.delivery_failures +=
                deliver(reminder, &recipients, self.delivery_timeout, ctx).await;

            match reschedule_or_retire(reminder, ctx).await {
                Ok(_) => summary.processed += 1,
                Err(e) => {
                    error!(
                        reminder = %reminder.id,
                        "Unable to update delivered reminder, it stays due: {:?}",
                        e
                    );
                    summary.store_failures += 1;
                }
            }
        }

        if !due.is_empty() {
            info!("Due reminders processed: {:?}", summary);
        }

        Ok(summary)
    }
}
