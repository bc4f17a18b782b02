//! Recurrence rule evaluation and projection horizons.
//!
//! [`occurs_on`] answers "does this rule fire on this date" and shares its
//! per-frequency calendar logic ([`Cadence`]) with the occurrence generator,
//! so both agree on month-end and last-weekday handling.

use std::{fmt, str::FromStr};

use chrono::{Datelike, Days, Duration, NaiveDate};
use flowcast_domain::{shift_year, Frequency, MonthKey, RecurrenceRule};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{CoreError, RuleError};

/// Returns `true` when `rule` has an occurrence on `date`.
///
/// Unknown or one-off frequencies only occur on the anchor date. Rules
/// without an anchor never occur.
pub fn occurs_on(rule: &RecurrenceRule, date: NaiveDate) -> bool {
    let Some(anchor) = rule.anchor_date else {
        return false;
    };
    if date < anchor {
        return false;
    }
    if rule.end_date.is_some_and(|end| date > end) {
        return false;
    }
    let step = i64::from(rule.step());
    let days = (date - anchor).num_days();
    match rule.frequency {
        Frequency::Once | Frequency::Unknown => date == anchor,
        Frequency::Daily => days % step == 0,
        Frequency::Weekly => days % (7 * step) == 0,
        Frequency::BiWeekly => days % (14 * step) == 0,
        Frequency::Monthly => {
            let month = MonthKey::from_date(date);
            let distance = MonthKey::from_date(anchor).months_until(month);
            distance % step == 0 && MonthDay::of(rule, anchor).resolve(month) == date
        }
        Frequency::Yearly => {
            let distance = date.year() - anchor.year();
            i64::from(distance) % step == 0 && shift_year(anchor, distance) == Some(date)
        }
    }
}

/// Checks the parts of a rule the generator relies on.
pub fn validate_rule(rule: &RecurrenceRule) -> Result<(), RuleError> {
    if rule.anchor_date.is_none() {
        return Err(RuleError::MissingAnchor);
    }
    if rule.frequency == Frequency::Unknown {
        return Err(RuleError::UnknownFrequency);
    }
    if rule.frequency == Frequency::Monthly && rule.last_day_of_month && rule.last_weekday_of_month
    {
        return Err(RuleError::ConflictingMonthEnd);
    }
    Ok(())
}

/// Which day of each target month a monthly rule lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MonthDay {
    Nominal(u32),
    LastDay,
    LastWeekday,
}

impl MonthDay {
    pub(crate) fn of(rule: &RecurrenceRule, anchor: NaiveDate) -> Self {
        if rule.last_day_of_month {
            MonthDay::LastDay
        } else if rule.last_weekday_of_month {
            MonthDay::LastWeekday
        } else {
            MonthDay::Nominal(rule.target_day(anchor))
        }
    }

    pub(crate) fn resolve(self, month: MonthKey) -> NaiveDate {
        match self {
            MonthDay::Nominal(day) => month.clamped_day(day),
            MonthDay::LastDay => month.last_day(),
            MonthDay::LastWeekday => month.last_weekday(),
        }
    }
}

/// Stepping function for a rule; candidate `n` is always computed from the anchor.
///
/// An interval too large to step in months or years leaves only the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Cadence {
    Single,
    Days(i64),
    Months { every: i32, day: MonthDay },
    Years { every: i32 },
}

impl Cadence {
    pub(crate) fn of(rule: &RecurrenceRule, anchor: NaiveDate) -> Self {
        let step = rule.step();
        match rule.frequency {
            Frequency::Once | Frequency::Unknown => Cadence::Single,
            Frequency::Daily => Cadence::Days(i64::from(step)),
            Frequency::Weekly => Cadence::Days(7 * i64::from(step)),
            Frequency::BiWeekly => Cadence::Days(14 * i64::from(step)),
            Frequency::Monthly => match i32::try_from(step) {
                Ok(every) => Cadence::Months {
                    every,
                    day: MonthDay::of(rule, anchor),
                },
                Err(_) => Cadence::Single,
            },
            Frequency::Yearly => match i32::try_from(step) {
                Ok(every) => Cadence::Years { every },
                Err(_) => Cadence::Single,
            },
        }
    }

    /// The `n`-th candidate counted from the anchor, or `None` once it would
    /// leave the representable calendar.
    pub(crate) fn nth(&self, anchor: NaiveDate, n: u32) -> Option<NaiveDate> {
        match *self {
            Cadence::Single => (n == 0).then_some(anchor),
            Cadence::Days(step) => {
                let offset = Duration::try_days(step.checked_mul(i64::from(n))?)?;
                anchor.checked_add_signed(offset)
            }
            Cadence::Months { every, day } => {
                let offset = every.checked_mul(i32::try_from(n).ok()?)?;
                let month = MonthKey::from_date(anchor).checked_shift(offset)?;
                Some(day.resolve(month))
            }
            Cadence::Years { every } => {
                shift_year(anchor, every.checked_mul(i32::try_from(n).ok()?)?)
            }
        }
    }

    /// Index of the last candidate that can precede `from`; earlier ones are skipped.
    pub(crate) fn first_index_from(&self, anchor: NaiveDate, from: NaiveDate) -> u32 {
        if from <= anchor {
            return 0;
        }
        let index = match *self {
            Cadence::Single => 0,
            Cadence::Days(step) => (from - anchor).num_days() / step,
            Cadence::Months { every, .. } => {
                let distance = MonthKey::from_date(anchor).months_until(MonthKey::from_date(from));
                distance / i64::from(every)
            }
            Cadence::Years { every } => i64::from((from.year() - anchor.year()) / every),
        };
        u32::try_from(index).unwrap_or(u32::MAX)
    }
}

/// Projection interval setting chosen by the user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectionInterval {
    Daily,
    Weekly,
    #[serde(alias = "biweekly")]
    BiWeekly,
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl ProjectionInterval {
    pub const ALL: [ProjectionInterval; 6] = [
        ProjectionInterval::Daily,
        ProjectionInterval::Weekly,
        ProjectionInterval::BiWeekly,
        ProjectionInterval::Monthly,
        ProjectionInterval::Quarterly,
        ProjectionInterval::Yearly,
    ];

    /// Last date covered by a projection started on `today`.
    pub fn horizon_end(self, today: NaiveDate) -> NaiveDate {
        match self {
            ProjectionInterval::Daily => today
                .checked_add_days(Days::new(30))
                .unwrap_or(NaiveDate::MAX),
            ProjectionInterval::Weekly | ProjectionInterval::BiWeekly => today
                .checked_add_days(Days::new(90))
                .unwrap_or(NaiveDate::MAX),
            ProjectionInterval::Monthly | ProjectionInterval::Quarterly => {
                shift_year(today, 1).unwrap_or(NaiveDate::MAX)
            }
            ProjectionInterval::Yearly => shift_year(today, 2).unwrap_or(NaiveDate::MAX),
        }
    }
}

impl fmt::Display for ProjectionInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProjectionInterval::Daily => "daily",
            ProjectionInterval::Weekly => "weekly",
            ProjectionInterval::BiWeekly => "bi-weekly",
            ProjectionInterval::Monthly => "monthly",
            ProjectionInterval::Quarterly => "quarterly",
            ProjectionInterval::Yearly => "yearly",
        };
        f.write_str(label)
    }
}

impl FromStr for ProjectionInterval {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(ProjectionInterval::Daily),
            "weekly" => Ok(ProjectionInterval::Weekly),
            "bi-weekly" | "biweekly" => Ok(ProjectionInterval::BiWeekly),
            "monthly" => Ok(ProjectionInterval::Monthly),
            "quarterly" => Ok(ProjectionInterval::Quarterly),
            "yearly" => Ok(ProjectionInterval::Yearly),
            _ => Err(CoreError::UnknownInterval(value.to_string())),
        }
    }
}

/// Horizon end for a raw setting string; unknown settings project one year.
pub fn projection_horizon_end(setting: &str, today: NaiveDate) -> NaiveDate {
    match setting.parse::<ProjectionInterval>() {
        Ok(interval) => interval.horizon_end(today),
        Err(_) => {
            debug!(setting, "unknown projection interval, using one year");
            shift_year(today, 1).unwrap_or(NaiveDate::MAX)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowcast_domain::TransactionType;
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rule(anchor: NaiveDate, frequency: Frequency) -> RecurrenceRule {
        RecurrenceRule::new(
            anchor,
            frequency,
            "test",
            Decimal::from(10),
            TransactionType::Expense,
        )
    }

    #[test]
    fn daily_respects_interval() {
        let every_third = rule(date(2025, 1, 1), Frequency::Daily).with_interval(3);
        assert!(occurs_on(&every_third, date(2025, 1, 1)));
        assert!(occurs_on(&every_third, date(2025, 1, 4)));
        assert!(!occurs_on(&every_third, date(2025, 1, 5)));
        assert!(!occurs_on(&every_third, date(2024, 12, 29)));
    }

    #[test]
    fn weekly_and_bi_weekly_use_whole_weeks() {
        let weekly = rule(date(2025, 1, 1), Frequency::Weekly);
        let bi_weekly = rule(date(2025, 1, 1), Frequency::BiWeekly);
        assert!(occurs_on(&weekly, date(2025, 1, 8)));
        assert!(!occurs_on(&weekly, date(2025, 1, 9)));
        assert!(!occurs_on(&bi_weekly, date(2025, 1, 8)));
        assert!(occurs_on(&bi_weekly, date(2025, 1, 15)));
    }

    #[test]
    fn monthly_clamps_per_month() {
        let rent = rule(date(2025, 1, 31), Frequency::Monthly);
        assert!(occurs_on(&rent, date(2025, 2, 28)));
        assert!(occurs_on(&rent, date(2025, 3, 31)));
        assert!(!occurs_on(&rent, date(2025, 3, 28)));
        assert!(occurs_on(&rent, date(2025, 4, 30)));
    }

    #[test]
    fn monthly_interval_skips_months() {
        let quarterly = rule(date(2025, 1, 15), Frequency::Monthly).with_interval(3);
        assert!(occurs_on(&quarterly, date(2025, 4, 15)));
        assert!(!occurs_on(&quarterly, date(2025, 2, 15)));
    }

    #[test]
    fn monthly_month_end_variants() {
        let last_day = rule(date(2025, 1, 10), Frequency::Monthly).on_last_day_of_month();
        assert!(occurs_on(&last_day, date(2025, 2, 28)));
        assert!(!occurs_on(&last_day, date(2025, 2, 10)));

        // 2025-05-31 is a Saturday, so the last weekday is Friday the 30th.
        let last_weekday = rule(date(2025, 1, 10), Frequency::Monthly).on_last_weekday_of_month();
        assert!(occurs_on(&last_weekday, date(2025, 5, 30)));
        assert!(!occurs_on(&last_weekday, date(2025, 5, 31)));
    }

    #[test]
    fn yearly_matches_anchor_month_and_day() {
        let renewal = rule(date(2024, 6, 10), Frequency::Yearly).with_interval(2);
        assert!(occurs_on(&renewal, date(2026, 6, 10)));
        assert!(!occurs_on(&renewal, date(2025, 6, 10)));
        assert!(!occurs_on(&renewal, date(2026, 6, 11)));
    }

    #[test]
    fn unknown_frequency_occurs_only_on_anchor() {
        let mut odd = rule(date(2025, 1, 1), Frequency::Weekly);
        odd.frequency = Frequency::Unknown;
        assert!(occurs_on(&odd, date(2025, 1, 1)));
        assert!(!occurs_on(&odd, date(2025, 1, 8)));
        assert_eq!(validate_rule(&odd), Err(RuleError::UnknownFrequency));
    }

    #[test]
    fn missing_anchor_never_occurs() {
        let mut orphan = rule(date(2025, 1, 1), Frequency::Daily);
        orphan.anchor_date = None;
        assert!(!occurs_on(&orphan, date(2025, 1, 1)));
        assert_eq!(validate_rule(&orphan), Err(RuleError::MissingAnchor));
    }

    #[test]
    fn end_date_stops_occurrences() {
        let capped = rule(date(2025, 1, 1), Frequency::Daily).with_end_date(date(2025, 1, 10));
        assert!(occurs_on(&capped, date(2025, 1, 10)));
        assert!(!occurs_on(&capped, date(2025, 1, 11)));
    }

    #[test]
    fn horizon_lookup_table() {
        let today = date(2025, 3, 15);
        assert_eq!(projection_horizon_end("daily", today), date(2025, 4, 14));
        assert_eq!(projection_horizon_end("weekly", today), date(2025, 6, 13));
        assert_eq!(projection_horizon_end("bi-weekly", today), date(2025, 6, 13));
        assert_eq!(projection_horizon_end("monthly", today), date(2026, 3, 15));
        assert_eq!(projection_horizon_end("quarterly", today), date(2026, 3, 15));
        assert_eq!(projection_horizon_end("yearly", today), date(2027, 3, 15));
        assert_eq!(projection_horizon_end("hourly", today), date(2026, 3, 15));
    }

    #[test]
    fn interval_round_trips_through_display() {
        for interval in ProjectionInterval::ALL {
            assert_eq!(interval.to_string().parse::<ProjectionInterval>(), Ok(interval));
        }
    }
}
