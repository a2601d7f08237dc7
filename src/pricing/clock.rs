use chrono::{DateTime, Utc};

/// Source of the "as of now" instant for the time-relative views.
///
/// Handlers read the clock once per request so that every window in a
/// response is computed against the same reference.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use tariff_compare::pricing::clock::{Clock, FixedClock};
///
/// let instant = Utc.with_ymd_and_hms(2024, 1, 17, 12, 0, 0).unwrap();
/// let clock = FixedClock::new(instant);
/// assert_eq!(clock.now(), instant);
/// ```
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self { instant }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant
    }
}
