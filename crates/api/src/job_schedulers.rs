use crate::{
    reminder::process_due_reminders::ProcessDueRemindersUseCase, shared::usecase::execute,
};
use notifier_infra::NotifierContext;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::info;

/// Seconds until the next multiple of `interval_secs` since the epoch
pub fn get_start_delay(now_ts: u64, interval_secs: u64) -> u64 {
    interval_secs - (now_ts / 1000) % interval_secs
}

/// Runs due processing on a fixed interval until stopped. Only one job runs
/// at a time per scheduler.
#[derive(Default)]
pub struct DueJobScheduler {
    stop_signal: Mutex<Option<Arc<Notify>>>,
}

impl DueJobScheduler {
    pub fn new() -> Self {
        Default::default()
    }

    fn stop_signal(&self) -> MutexGuard<'_, Option<Arc<Notify>>> {
        self.stop_signal
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns `false` if the job was already running or is disabled by configuration
    pub fn start(&self, ctx: NotifierContext) -> bool {
        let interval_secs = ctx.config.poll_interval_secs;
        if interval_secs == 0 {
            info!("Due reminders job is disabled, waiting for external triggers");
            return false;
        }

        let mut stop_signal = self.stop_signal();
        if stop_signal.is_some() {
            return false;
        }
        let stop = Arc::new(Notify::new());
        *stop_signal = Some(stop.clone());

        actix_web::rt::spawn(run_due_job(ctx, interval_secs, stop));
        info!(
            "Due reminders job started, running every {} seconds",
            interval_secs
        );
        true
    }

    /// Returns `false` if the job was not running. A run in progress completes first.
    pub fn stop(&self) -> bool {
        match self.stop_signal().take() {
            Some(stop) => {
                stop.notify_one();
                info!("Due reminders job stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.stop_signal().is_some()
    }
}

async fn run_due_job(ctx: NotifierContext, interval_secs: u64, stop: Arc<Notify>) {
    let now = ctx.sys.get_timestamp_millis().max(0) as u64;
    let start = Instant::now() + Duration::from_secs(get_start_delay(now, interval_secs));
    let mut interval = interval_at(start, Duration::from_secs(interval_secs));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = stop.notified() => break,
            _ = interval.tick() => {
                let usecase = ProcessDueRemindersUseCase::new(&ctx.config);
                let _ = execute(usecase, &ctx).await;
            }
        }
    }
}
