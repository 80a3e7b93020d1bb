//! The single temporal reference a pipeline run is evaluated against.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

/// "Now" for one pipeline run.
///
/// Captured once at startup and passed to every stage, so all rows are
/// compared with the same current month and the same trailing window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceInstant {
    now: NaiveDateTime,
}

impl ReferenceInstant {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }

    /// Captures the local wall-clock time.
    pub fn capture() -> Self {
        Self::new(Local::now().naive_local())
    }

    /// Reference pinned to midnight at the start of `date`.
    pub fn start_of(date: NaiveDate) -> Self {
        Self::new(date.and_time(NaiveTime::MIN))
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date()
    }

    pub fn year(&self) -> i32 {
        self.now.year()
    }

    pub fn month(&self) -> u32 {
        self.now.month()
    }

    /// True when `date` is in the reference month and year.
    pub fn is_current_month(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// Start of the trailing window of `weeks` weeks ending now, or `None`
    /// when it falls before the earliest representable instant.
    pub fn window_start(&self, weeks: u32) -> Option<NaiveDateTime> {
        TimeDelta::try_weeks(i64::from(weeks)).and_then(|span| self.now.checked_sub_signed(span))
    }

    /// True when `instant` lies between the window start (inclusive) and the
    /// end of the reference day.
    ///
    /// The upper bound is the reference date rather than the instant, so a
    /// draw logged later on the same day still counts. An unrepresentable
    /// window start never matches.
    pub fn in_trailing_window(&self, instant: NaiveDateTime, weeks: u32) -> bool {
        self.window_start(weeks)
            .is_some_and(|start| instant >= start && instant.date() <= self.today())
    }

    /// Whole years from `birth` to today, one less if this year's birthday
    /// has not happened yet.
    pub fn age_in_years(&self, birth: NaiveDate) -> i64 {
        let today = self.today();
        let mut years = i64::from(today.year()) - i64::from(birth.year());
        if (today.month(), today.day()) < (birth.month(), birth.day()) {
            years -= 1;
        }
        years
    }
}
