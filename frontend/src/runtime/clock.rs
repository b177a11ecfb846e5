use chrono::{Local, NaiveDateTime, Utc};

pub trait Clock {
    /// Local wall-clock time.
    fn now(&self) -> NaiveDateTime;
    fn timestamp_millis(&self) -> i64;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn timestamp_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}
