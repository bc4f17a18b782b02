//! Lowest projected balances for user warnings.

use chrono::{Datelike, NaiveDate};
use flowcast_domain::{ProjectionSummaryPoint, TimelineEntry};
use rust_decimal::Decimal;

pub const DEFAULT_LOWEST_COUNT: usize = 3;
pub const TODAY_LABEL: &str = "Today";

/// The `k` lowest balance points between `today` and `horizon_end`.
///
/// Candidates are the opening balance (labelled "Today") and, per date, the
/// lowest balance the timeline reaches on that date. Ties keep chronological
/// order with today first. An empty timeline yields no points.
pub fn lowest(
    timeline: &[TimelineEntry],
    opening_balance: Decimal,
    today: NaiveDate,
    horizon_end: NaiveDate,
    k: usize,
) -> Vec<ProjectionSummaryPoint> {
    if timeline.is_empty() || k == 0 {
        return Vec::new();
    }

    let mut candidates = vec![ProjectionSummaryPoint {
        date: today,
        balance: opening_balance,
        label: TODAY_LABEL.to_string(),
    }];
    let mut day: Option<ProjectionSummaryPoint> = None;
    for entry in timeline.iter().filter(|entry| entry.date() <= horizon_end) {
        match day.as_mut() {
            Some(point) if point.date == entry.date() => {
                point.balance = point.balance.min(entry.balance);
            }
            _ => {
                let next = ProjectionSummaryPoint {
                    date: entry.date(),
                    balance: entry.balance,
                    label: date_label(entry.date(), today),
                };
                candidates.extend(day.replace(next));
            }
        }
    }
    candidates.extend(day);

    candidates.sort_by(|a, b| a.balance.cmp(&b.balance));
    candidates.truncate(k);
    candidates
}

/// Short label such as `Mar 4`, with the year added outside the current year.
pub fn date_label(date: NaiveDate, today: NaiveDate) -> String {
    if date.year() == today.year() {
        date.format("%b %-d").to_string()
    } else {
        date.format("%b %-d, %Y").to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use flowcast_domain::Transaction;

    use super::*;
    use crate::timeline::build;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(date: NaiveDate, balance: i64) -> TimelineEntry {
        TimelineEntry {
            transaction: Transaction::expense(date, "x", Decimal::ONE),
            balance: Decimal::from(balance),
        }
    }

    #[test]
    fn picks_three_lowest_with_repeats_on_distinct_dates() {
        let today = date(2025, 6, 1);
        let timeline: Vec<_> = [500, -20, 300, -20, 1000]
            .into_iter()
            .enumerate()
            .map(|(i, balance)| entry(today + Duration::days(i as i64 + 1), balance))
            .collect();
        let points = lowest(&timeline, Decimal::from(800), today, date(2025, 12, 31), 3);
        let balances: Vec<_> = points.iter().map(|p| p.balance).collect();
        assert_eq!(
            balances,
            vec![Decimal::from(-20), Decimal::from(-20), Decimal::from(300)]
        );
        assert_eq!(points[0].date, date(2025, 6, 3));
        assert_eq!(points[1].date, date(2025, 6, 5));
        assert_eq!(points[0].label, "Jun 3");
    }

    #[test]
    fn opening_balance_competes_as_today() {
        let today = date(2025, 6, 1);
        let timeline = vec![entry(date(2025, 6, 2), 50), entry(date(2025, 6, 3), 70)];
        let points = lowest(&timeline, Decimal::from(10), today, date(2025, 6, 30), 3);
        assert_eq!(points[0].label, TODAY_LABEL);
        assert_eq!(points[0].date, today);
        assert_eq!(points.len(), 3);
    }

    #[test]
    fn horizon_excludes_later_entries() {
        let today = date(2025, 6, 1);
        let timeline = vec![entry(date(2025, 6, 2), 50), entry(date(2025, 9, 1), -500)];
        let points = lowest(&timeline, Decimal::from(100), today, date(2025, 7, 1), 3);
        assert_eq!(points.len(), 2);
        assert!(points.iter().all(|p| p.date <= date(2025, 7, 1)));
    }

    #[test]
    fn same_day_entries_collapse_to_lowest() {
        let today = date(2025, 1, 1);
        let timeline = build(
            &[
                Transaction::expense(date(2025, 1, 2), "Rent", Decimal::from(900)),
                Transaction::income(date(2025, 1, 2), "Salary", Decimal::from(1500)),
            ],
            Decimal::from(100),
        );
        let points = lowest(&timeline, Decimal::from(100), today, date(2025, 2, 1), 3);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].balance, Decimal::from(-800));
        assert_eq!(points[0].date, date(2025, 1, 2));
    }

    #[test]
    fn empty_timeline_yields_nothing() {
        let today = date(2025, 1, 1);
        assert!(lowest(&[], Decimal::from(5), today, date(2026, 1, 1), 3).is_empty());
    }

    #[test]
    fn labels_include_year_outside_current_year() {
        let today = date(2025, 12, 20);
        assert_eq!(date_label(date(2026, 1, 4), today), "Jan 4, 2026");
        assert_eq!(date_label(date(2025, 12, 24), today), "Dec 24");
    }
}
