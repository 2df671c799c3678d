use notifier_api::Application;
use notifier_domain::RecipientId;
use notifier_infra::{Config, INotificationChannel, ISys, NotifierContext, RecipientRegistry};
use notifier_sdk::NotifierSDK;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

pub struct TestClock {
    now: AtomicI64,
}

impl TestClock {
    pub fn set(&self, now: i64) {
        self.now.store(now, Ordering::SeqCst);
    }
}

impl ISys for TestClock {
    fn get_timestamp_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct Inbox {
    messages: Mutex<Vec<(RecipientId, String)>>,
}

impl Inbox {
    pub fn messages(&self) -> Vec<(RecipientId, String)> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl INotificationChannel for Inbox {
    async fn send(&self, recipient: &RecipientId, text: &str) -> anyhow::Result<()> {
        self.messages
            .lock()
            .unwrap()
            .push((recipient.clone(), text.to_string()));
        Ok(())
    }
}

pub struct TestApp {
    pub config: Config,
    pub address: String,
    pub clock: Arc<TestClock>,
    pub inbox: Arc<Inbox>,
    /// Client holding the admin api key
    pub admin: NotifierSDK,
    /// Client holding the trigger secret
    pub trigger: NotifierSDK,
}

// Launch the application as a background task
pub async fn spawn_app(now: i64) -> TestApp {
    let mut ctx = NotifierContext::create_inmemory();
    ctx.config.port = 0; // Random port
    ctx.config.poll_interval_secs = 0; // Only process due reminders when triggered
    ctx.config.timezone = chrono_tz::UTC;

    let clock = Arc::new(TestClock {
        now: AtomicI64::new(now),
    });
    let inbox = Arc::new(Inbox::default());
    ctx.sys = clock.clone();
    ctx.notifications = inbox.clone();
    ctx.recipients = Arc::new(RecipientRegistry::new(
        &[RecipientId::new("100")],
        &[RecipientId::new("200")],
    ));

    let config = ctx.config.clone();
    let application = Application::new(ctx)
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}/api/v1", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    TestApp {
        admin: NotifierSDK::new_admin(address.clone(), config.admin_api_key.clone()),
        trigger: NotifierSDK::new_trigger(address.clone(), config.trigger_secret.clone()),
        config,
        address,
        clock,
        inbox,
    }
}
