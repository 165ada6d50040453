//! Calendar helpers shared by the generator and the view projector.
//!
//! Everything works on naive local values: the planner assumes one implicit
//! local timezone for all of an owner's data.

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};

/// Source of "now" for request handling.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Reads the host's local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Last representable millisecond of `date`.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + Duration::days(1) - Duration::milliseconds(1)
}

/// The Sunday that opens the week containing `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

/// Day of week with 0 = Sunday.
pub fn day_of_week(date: NaiveDate) -> u8 {
    // num_days_from_sunday is always in 0..=6
    date.weekday().num_days_from_sunday() as u8
}

/// Zero-based week offset of `date` from `start`, floored so days before
/// `start` land in negative weeks.
pub fn week_index(date: NaiveDate, start: NaiveDate) -> i64 {
    (date - start).num_days().div_euclid(7)
}

/// An occurrence is missed once its day has passed without completion.
pub fn is_missed(date: NaiveDateTime, is_completed: bool, today: NaiveDate) -> bool {
    date < start_of_day(today) && !is_completed
}

/// Parses a `YYYY-MM-DD` query value.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}
