use chrono::{DateTime, Local, NaiveDateTime, Utc};

// Mocking out time so that it is possible to run tests that depend on time.
pub trait ISys: Send + Sync {
    /// The current instant, used to timestamp dispatch records
    fn now(&self) -> DateTime<Utc>;
    /// Wall clock in the property manager's local timezone. Drives the
    /// business-hour guard and the due-date evaluation.
    fn now_local(&self) -> NaiveDateTime;
}

/// System that gets the real time and is used when not testing
pub struct RealSys {}

impl ISys for RealSys {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn now_local(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
