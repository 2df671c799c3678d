use notifier_domain::RecipientId;
use notifier_infra::{INotificationChannel, ISys};
use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Clock standing still at a given timestamp until it is moved
pub struct StaticTimeSys {
    now: AtomicI64,
}

impl StaticTimeSys {
    pub fn new(now: i64) -> Self {
        Self {
            now: AtomicI64::new(now),
        }
    }

    pub fn set(&self, now: i64) {
        self.now.store(now, Ordering::SeqCst);
    }
}

impl ISys for StaticTimeSys {
    fn get_timestamp_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Records every delivery. Deliveries to `failing` recipients fail and
/// deliveries to `hanging` recipients never complete.
#[derive(Default)]
pub struct RecordingChannel {
    pub deliveries: Mutex<Vec<(RecipientId, String)>>,
    pub failing: HashSet<(RecipientId, String)>,
    pub hanging: HashSet<RecipientId>,
}

impl RecordingChannel {
    pub fn failing_for(recipient: &str, text: &str) -> Self {
        let mut channel = Self::default();
        channel
            .failing
            .insert((RecipientId::new(recipient), text.to_string()));
        channel
    }

    pub fn hanging_for(recipient: &str) -> Self {
        let mut channel = Self::default();
        channel.hanging.insert(RecipientId::new(recipient));
        channel
    }

    pub fn deliveries(&self) -> Vec<(RecipientId, String)> {
        self.deliveries.lock().unwrap().clone()
    }

    pub fn deliveries_of(&self, text: &str) -> Vec<RecipientId> {
        self.deliveries()
            .into_iter()
            .filter(|(_, t)| t == text)
            .map(|(recipient, _)| recipient)
            .collect()
    }
}

#[async_trait::async_trait]
impl INotificationChannel for RecordingChannel {
    async fn send(&self, recipient: &RecipientId, text: &str) -> anyhow::Result<()> {
        if self.hanging.contains(recipient) {
            tokio::time::sleep(Duration::from_secs(60 * 60)).await;
        }
        if self
            .failing
            .contains(&(recipient.clone(), text.to_string()))
        {
            anyhow::bail!("Recipient {} is unreachable", recipient);
        }
        self.deliveries
            .lock()
            .unwrap()
            .push((recipient.clone(), text.to_string()));
        Ok(())
    }
}
