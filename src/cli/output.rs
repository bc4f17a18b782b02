//! Plain-text rendering of projections and month windows.

use std::io::{self, Write};

use colored::Colorize;
use flowcast_core::ProjectionReport;
use flowcast_domain::{DateWindow, DayGroups, MonthKey, TimelineEntry, TimelineItem};
use rust_decimal::Decimal;

const DESCRIPTION_WIDTH: usize = 28;
const AMOUNT_WIDTH: usize = 12;

pub fn format_amount(amount: Decimal, currency: &str) -> String {
    format!("{:.2} {currency}", amount.round_dp(2))
}

fn format_signed(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("{rounded:.2}")
    } else {
        format!("+{:.2}", rounded.abs())
    }
}

/// Negative balances are highlighted.
fn balance_cell(balance: Decimal, currency: &str) -> String {
    let text = format!(
        "{:>width$}",
        format_amount(balance, currency),
        width = AMOUNT_WIDTH + currency.len() + 1
    );
    if balance.is_sign_negative() && !balance.is_zero() {
        text.red().bold().to_string()
    } else {
        text
    }
}

fn section(out: &mut dyn Write, title: &str) -> io::Result<()> {
    writeln!(out, "{}", format!("=== {title} ===").bold())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

fn entry_line(entry: &TimelineEntry, currency: &str) -> String {
    let txn = &entry.transaction;
    let marker = if txn.is_generated() { "↻" } else { " " };
    format!(
        "{marker} {:<width$} {:>amount$} {}",
        truncate(&txn.description, DESCRIPTION_WIDTH),
        format_signed(txn.signed_amount()),
        balance_cell(entry.balance, currency),
        width = DESCRIPTION_WIDTH,
        amount = AMOUNT_WIDTH,
    )
}

/// Writes the projected timeline, interleaved with the lowest-balance points,
/// followed by a ranked summary.
pub fn write_report(
    out: &mut dyn Write,
    report: &ProjectionReport,
    currency: &str,
) -> io::Result<()> {
    section(
        out,
        &format!(
            "Projection ({}) {} to {}",
            report.interval, report.today, report.horizon_end
        ),
    )?;
    writeln!(
        out,
        "Opening balance: {}",
        format_amount(report.opening_balance, currency)
    )?;

    let items = report.items();
    if report.timeline.is_empty() {
        writeln!(out, "No transactions within the horizon.")?;
    }
    for item in &items {
        match item {
            TimelineItem::Transaction(entry) => {
                writeln!(out, "{}  {}", entry.date(), entry_line(entry, currency))?;
            }
            TimelineItem::Summary(point) => {
                let line = format!(
                    "{}  ▼ low point ({}) {}",
                    point.date,
                    point.label,
                    format_amount(point.balance, currency)
                );
                writeln!(out, "{}", line.yellow())?;
            }
        }
    }

    writeln!(
        out,
        "Closing balance: {}",
        format_amount(report.closing_balance(), currency)
    )?;

    if !report.lowest.is_empty() {
        section(out, "Lowest balances")?;
        for (rank, point) in report.lowest.iter().enumerate() {
            writeln!(
                out,
                "{}. {:<14} {}",
                rank + 1,
                point.label,
                balance_cell(point.balance, currency)
            )?;
        }
    }
    Ok(())
}

/// Writes a grouped three-month window, one block per day.
pub fn write_window(
    out: &mut dyn Write,
    view_month: MonthKey,
    range: DateWindow,
    groups: &DayGroups,
    currency: &str,
) -> io::Result<()> {
    section(
        out,
        &format!("{} to {} ({range})", view_month, view_month.shift(2)),
    )?;
    if groups.is_empty() {
        writeln!(out, "No transactions in this window.")?;
        return Ok(());
    }
    for (day, entries) in groups {
        writeln!(out, "{}", day.format("%a %Y-%m-%d").to_string().bold())?;
        for entry in entries {
            writeln!(out, "  {}", entry_line(entry, currency))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_amounts_carry_explicit_sign() {
        assert_eq!(format_signed(Decimal::new(-5050, 2)), "-50.50");
        assert_eq!(format_signed(Decimal::from(2000)), "+2000.00");
        assert_eq!(format_signed(Decimal::ZERO), "+0.00");
    }

    #[test]
    fn amounts_round_to_cents() {
        assert_eq!(format_amount(Decimal::new(12346, 3), "EUR"), "12.35 EUR");
    }

    #[test]
    fn long_descriptions_are_truncated() {
        let text = truncate("Quarterly insurance premium for the car", 10);
        assert_eq!(text.chars().count(), 10);
        assert!(text.ends_with('…'));
        assert_eq!(truncate("Rent", 10), "Rent");
    }
}
