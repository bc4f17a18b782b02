//! Chronological timeline construction with running balances.

use std::collections::HashSet;

use flowcast_domain::{DateWindow, DayGroups, GeneratedOccurrence, TimelineEntry, Transaction};
use rust_decimal::Decimal;

use crate::diagnostics::{Diagnostic, DiagnosticSink};

/// Orders `transactions` by date and annotates each with the balance after it.
///
/// Same-date transactions keep their input order. The input is left untouched.
pub fn build(transactions: &[Transaction], opening_balance: Decimal) -> Vec<TimelineEntry> {
    let mut ordered: Vec<&Transaction> = transactions.iter().collect();
    ordered.sort_by_key(|txn| txn.date);

    let mut balance = opening_balance;
    ordered
        .into_iter()
        .map(|txn| {
            balance += txn.signed_amount();
            TimelineEntry {
                transaction: txn.clone(),
                balance,
            }
        })
        .collect()
}

/// Partitions a timeline by calendar day, preserving timeline order within a day.
pub fn group_by_day(timeline: &[TimelineEntry]) -> DayGroups {
    let mut groups = DayGroups::new();
    for entry in timeline {
        groups.entry(entry.date()).or_default().push(entry.clone());
    }
    groups
}

/// Concatenates ledger transactions and generated occurrences, keeping the first
/// transaction seen for each id.
pub fn merge(
    transactions: &[Transaction],
    occurrences: Vec<GeneratedOccurrence>,
    sink: &mut dyn DiagnosticSink,
) -> Vec<Transaction> {
    let mut seen = HashSet::with_capacity(transactions.len() + occurrences.len());
    let mut merged = Vec::with_capacity(transactions.len() + occurrences.len());
    let candidates = transactions
        .iter()
        .cloned()
        .chain(occurrences.into_iter().map(GeneratedOccurrence::into_transaction));
    for txn in candidates {
        if seen.insert(txn.id) {
            merged.push(txn);
        } else {
            sink.record(Diagnostic::DuplicateOccurrence {
                id: txn.id,
                date: txn.date,
            });
        }
    }
    merged
}

/// Entries dated inside `window`, in timeline order.
pub fn entries_within(timeline: &[TimelineEntry], window: DateWindow) -> Vec<TimelineEntry> {
    timeline
        .iter()
        .filter(|entry| window.contains(entry.date()))
        .cloned()
        .collect()
}

pub fn closing_balance(timeline: &[TimelineEntry], opening_balance: Decimal) -> Decimal {
    timeline
        .last()
        .map(|entry| entry.balance)
        .unwrap_or(opening_balance)
}
