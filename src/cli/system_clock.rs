use chrono::{DateTime, Local, NaiveDate, Utc};

use flowcast_core::Clock;

/// Real-time clock backed by the system time source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    /// The local calendar date, so "today" matches the user's wall clock.
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}
