//! Wall-clock access and calendar-date helpers.
//!
//! Everything in the core that needs "now" or "today" asks a [`Clock`], so the
//! plan generator, rollover and timer can be driven deterministically in tests.
//! Calendar dates carry no time-of-day component.

use std::cell::Cell;

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};

use crate::error::ValidationError;

/// Date format used for persisted dates and CLI arguments.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Source of the current instant and the current calendar date.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Today's date with the time of day truncated.
    fn today(&self) -> NaiveDate;

    fn tomorrow(&self) -> NaiveDate {
        next_day(self.today())
    }
}

/// Clock backed by the operating system, dates in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Hand-driven clock. Dates are taken in UTC so results never depend on the
/// machine's time zone.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    /// Clock set to `hour:minute` UTC on `date`.
    pub fn at(date: NaiveDate, hour: u32, minute: u32) -> Self {
        let naive = date
            .and_hms_opt(hour, minute, 0)
            .unwrap_or_else(|| date.and_time(chrono::NaiveTime::MIN));
        Self::new(Utc.from_utc_datetime(&naive))
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }

    fn today(&self) -> NaiveDate {
        self.now.get().date_naive()
    }
}

pub fn next_day(date: NaiveDate) -> NaiveDate {
    date.succ_opt().unwrap_or(date)
}

/// Parse a `YYYY-MM-DD` string.
pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| {
        ValidationError::InvalidValue {
            field: "date".into(),
            message: format!("'{value}' is not a YYYY-MM-DD date ({e})"),
        }
    })
}

/// Whole days from `from` to `to`, never negative.
pub fn days_until(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days().max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn manual_clock_truncates_time_of_day() {
        let clock = ManualClock::at(date(2026, 1, 10), 23, 59);
        assert_eq!(clock.today(), date(2026, 1, 10));
        assert_eq!(clock.tomorrow(), date(2026, 1, 11));
    }

    #[test]
    fn manual_clock_advance_crosses_midnight() {
        let clock = ManualClock::at(date(2026, 1, 10), 23, 30);
        clock.advance(Duration::minutes(45));
        assert_eq!(clock.today(), date(2026, 1, 11));
    }

    #[test]
    fn tomorrow_rolls_over_month_end() {
        let clock = ManualClock::at(date(2026, 1, 31), 8, 0);
        assert_eq!(clock.tomorrow(), date(2026, 2, 1));
    }

    #[test]
    fn parse_date_accepts_iso_and_rejects_garbage() {
        assert_eq!(parse_date("2026-04-19").unwrap(), date(2026, 4, 19));
        assert_eq!(parse_date(" 2026-04-19 ").unwrap(), date(2026, 4, 19));
        assert!(parse_date("19/04/2026").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn days_until_clamps_past_dates() {
        assert_eq!(days_until(date(2026, 4, 1), date(2026, 4, 19)), 18);
        assert_eq!(days_until(date(2026, 4, 20), date(2026, 4, 19)), 0);
    }
}
