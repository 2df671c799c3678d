use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use notifier_domain::from_timestamp_millis;

/// Source of the current time. Everything that depends on "now" reads it from
/// here so that tests can move the clock.
pub trait ISys: Send + Sync {
    /// The current timestamp in millis
    fn get_timestamp_millis(&self) -> i64;

    /// The current time expressed in the given timezone
    fn now_in(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        from_timestamp_millis(tz, self.get_timestamp_millis())
    }
}

/// Reads the system clock, used outside of tests
pub struct RealSys {}
impl ISys for RealSys {
    fn get_timestamp_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}
