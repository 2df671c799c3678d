mod config;
mod repos;
mod services;
mod system;

pub use config::{parse_recipient_list, Config, NotificationChannelConfig};
pub use repos::{IReminderRepo, ReminderRepoError, Repos};
pub use services::*;
use std::sync::Arc;
pub use system::ISys;
use system::RealSys;
use tokio::sync::Mutex;
use tracing::warn;

#[derive(Clone)]
pub struct NotifierContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub recipients: Arc<dyn IRecipientResolver>,
    pub notifications: Arc<dyn INotificationChannel>,
    /// Held for the whole duration of one due processing run
    pub due_processing_lock: Arc<Mutex<()>>,
}

struct ContextParams {
    pub postgres_connection_string: Option<String>,
}

impl NotifierContext {
    fn new(repos: Repos, config: Config) -> Self {
        let recipients = Arc::new(RecipientRegistry::new(
            &config.admin_ids,
            &config.allowed_users,
        ));
        let notifications = create_notification_channel(&config.notification_channel);
        Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            recipients,
            notifications,
            due_processing_lock: Arc::new(Mutex::new(())),
        }
    }

    async fn create(params: ContextParams) -> Self {
        let repos = match params.postgres_connection_string {
            Some(connection_string) => Repos::create_postgres(&connection_string)
                .await
                .expect("Postgres credentials must be valid and the database reachable"),
            None => {
                warn!("DATABASE_URL is not set, reminders will only be stored in memory.");
                Repos::create_inmemory()
            }
        };
        Self::new(repos, Config::new())
    }

    pub fn create_inmemory() -> Self {
        Self::new(Repos::create_inmemory(), Config::new())
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> NotifierContext {
    NotifierContext::create(ContextParams {
        postgres_connection_string: get_psql_connection_string(),
    })
    .await
}

fn get_psql_connection_string() -> Option<String> {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING)
        .ok()
        .filter(|connection_string| !connection_string.is_empty())
}
