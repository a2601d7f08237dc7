//! Calendar arithmetic for the day and week views.
//!
//! All dates are interpreted in one fixed UTC offset; windows are
//! half-open `[start, end)` ranges of UTC instants.

use chrono::{
    DateTime, Datelike, Days, FixedOffset, NaiveDate, NaiveTime, Offset, TimeDelta, Utc,
};

use crate::domain::{DayOfWeek, Reading};

/// Half-open interval `[start, end)` of instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }

    /// Readings whose timestamp falls inside the window.
    pub fn select(&self, readings: &[Reading]) -> Vec<Reading> {
        readings
            .iter()
            .filter(|r| self.contains(r.time))
            .cloned()
            .collect()
    }
}

/// Maps instants to local calendar dates and back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    offset: FixedOffset,
}

impl Default for Calendar {
    fn default() -> Self {
        Self::utc()
    }
}

impl Calendar {
    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    /// Calendar in a fixed offset east of UTC.
    ///
    /// Returns `None` when the offset is outside ±24h.
    pub fn with_offset_minutes(minutes: i32) -> Option<Self> {
        let seconds = minutes.checked_mul(60)?;
        FixedOffset::east_opt(seconds).map(|offset| Self { offset })
    }

    /// Local calendar date containing `instant`.
    pub fn date_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    /// First instant of the local day `date`.
    pub fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        let local_midnight = date.and_time(NaiveTime::MIN);
        let shift = TimeDelta::seconds(i64::from(self.offset.local_minus_utc()));
        (local_midnight - shift).and_utc()
    }

    /// Monday of the week containing `date`.
    pub fn monday_of(date: NaiveDate) -> NaiveDate {
        date - Days::new(u64::from(date.weekday().num_days_from_monday()))
    }

    /// The full local day `date`.
    pub fn day_window(&self, date: NaiveDate) -> TimeWindow {
        TimeWindow::new(
            self.start_of_day(date),
            self.start_of_day(date + Days::new(1)),
        )
    }

    /// From the start of the local day containing `now` up to `now`.
    pub fn today_so_far(&self, now: DateTime<Utc>) -> TimeWindow {
        TimeWindow::new(self.start_of_day(self.date_of(now)), now)
    }

    /// Monday 00:00 up to Sunday 00:00 of the calendar week before `now`.
    pub fn last_week(&self, now: DateTime<Utc>) -> TimeWindow {
        let monday = Self::monday_of(self.date_of(now)) - Days::new(7);
        let sunday = monday + Days::new(6);
        TimeWindow::new(self.start_of_day(monday), self.start_of_day(sunday))
    }

    /// Every date from this week's Monday through the date of `now`.
    ///
    /// Always holds between one and seven entries, Monday first.
    pub fn week_so_far(&self, now: DateTime<Utc>) -> Vec<(DayOfWeek, NaiveDate)> {
        let today = self.date_of(now);
        Self::monday_of(today)
            .iter_days()
            .take_while(|date| *date <= today)
            .map(|date| (DayOfWeek::from(date.weekday()), date))
            .collect()
    }
}
