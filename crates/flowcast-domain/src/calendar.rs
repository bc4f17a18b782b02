//! Calendar arithmetic shared by the recurrence and projection code.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
/// Inclusive date range used for expansion and view windows.
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateWindowError> {
        if end < start {
            return Err(DateWindowError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Returns the window with its end pulled back to `limit` when it reaches past it.
    pub fn clamp_end(&self, limit: NaiveDate) -> Self {
        Self {
            start: self.start,
            end: self.end.min(limit).max(self.start),
        }
    }

}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Errors that can occur when constructing [`DateWindow`] values.
pub enum DateWindowError {
    InvalidRange,
}

impl fmt::Display for DateWindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateWindowError::InvalidRange => f.write_str("date window end must not precede start"),
        }
    }
}

impl std::error::Error for DateWindowError {}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// A calendar month, used as the view position and cache key of the month window.
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    /// Builds a key, returning `None` when `month` is outside `1..=12` or the
    /// month lies beyond the representable calendar.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        ymd(self.year, self.month, 1)
    }

    pub fn last_day(&self) -> NaiveDate {
        ymd(self.year, self.month, days_in_month(self.year, self.month))
    }

    pub fn days(&self) -> u32 {
        days_in_month(self.year, self.month)
    }

    /// Moves by `months`; `None` when the result leaves the representable calendar.
    pub fn checked_shift(&self, months: i32) -> Option<Self> {
        let index = self.index().checked_add(i64::from(months))?;
        let year = i32::try_from(index.div_euclid(12)).ok()?;
        let month = u32::try_from(index.rem_euclid(12)).ok()? + 1;
        MonthKey::new(year, month)
    }

    /// Moves by `months`, staying put at the edges of the representable calendar.
    pub fn shift(&self, months: i32) -> Self {
        self.checked_shift(months).unwrap_or(*self)
    }

    pub fn succ(&self) -> Self {
        self.shift(1)
    }

    pub fn pred(&self) -> Self {
        self.shift(-1)
    }

    /// Number of months from `self` to `other`; negative when `other` is earlier.
    pub fn months_until(&self, other: MonthKey) -> i64 {
        other.index() - self.index()
    }

    /// Day `day` of this month, clamped to the month's last day.
    pub fn clamped_day(&self, day: u32) -> NaiveDate {
        ymd(self.year, self.month, day.clamp(1, self.days()))
    }

    /// Last Monday-to-Friday date of this month.
    pub fn last_weekday(&self) -> NaiveDate {
        let mut date = self.last_day();
        while matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            date -= Duration::days(1);
        }
        date
    }

    fn index(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for MonthKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (year, month) = value
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("expected YYYY-MM, got `{value}`"))?;
        let year: i32 = year
            .parse()
            .map_err(|_| format!("invalid year in `{value}`"))?;
        let month: u32 = month
            .parse()
            .map_err(|_| format!("invalid month in `{value}`"))?;
        MonthKey::new(year, month).ok_or_else(|| format!("month out of range in `{value}`"))
    }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    match NaiveDate::from_ymd_opt(next_year, next_month, 1) {
        Some(first_next) => (first_next - Duration::days(1)).day(),
        None => 31,
    }
}

pub fn is_last_day_of_month(date: NaiveDate) -> bool {
    date.day() == days_in_month(date.year(), date.month())
}

pub fn is_last_weekday_of_month(date: NaiveDate) -> bool {
    MonthKey::from_date(date).last_weekday() == date
}

/// Moves `date` by `months`, clamping the day to the target month's length.
///
/// `None` when the target month is outside the representable calendar.
pub fn shift_month(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let month = MonthKey::from_date(date).checked_shift(months)?;
    Some(month.clamped_day(date.day()))
}

/// Moves `date` by `years`, keeping month and day (Feb 29 becomes Feb 28 off leap years).
pub fn shift_year(date: NaiveDate, years: i32) -> Option<NaiveDate> {
    shift_month(date, years.checked_mul(12)?)
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    // Keys are validated on construction and days are clamped to the month.
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}
