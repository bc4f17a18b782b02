//! Expansion of recurrence rules into dated occurrences.

use chrono::NaiveDate;
use flowcast_domain::{shift_year, DateWindow, GeneratedOccurrence, RecurrenceRule};
use tracing::debug;

use crate::{
    diagnostics::{Diagnostic, DiagnosticSink},
    recurrence::{validate_rule, Cadence},
    RuleError,
};

/// Hard cap on the occurrences a single rule may produce in one call.
pub const MAX_OCCURRENCES_PER_RULE: usize = 4096;
/// Longest expansion window, measured from the window start.
pub const MAX_HORIZON_YEARS: i32 = 3;

/// Expands `rule` into the occurrences that fall inside `window`.
///
/// The anchor date itself is never emitted; the caller supplies the rule's own
/// transaction. Output is sorted by date and carries deterministic ids, so two
/// calls with the same arguments return equal vectors.
pub fn expand(
    rule: &RecurrenceRule,
    window: DateWindow,
    sink: &mut dyn DiagnosticSink,
) -> Vec<GeneratedOccurrence> {
    let Some(anchor) = rule.anchor_date else {
        sink.record(Diagnostic::MalformedRule {
            rule_id: rule.id,
            error: RuleError::MissingAnchor,
        });
        return Vec::new();
    };
    if let Err(error) = validate_rule(rule) {
        sink.record(Diagnostic::MalformedRule {
            rule_id: rule.id,
            error,
        });
    }

    let window = clamp_to_horizon(rule, window, sink);
    let cadence = Cadence::of(rule, anchor);
    let mut occurrences = Vec::new();
    let mut index = cadence.first_index_from(anchor, window.start);

    while let Some(candidate) = cadence.nth(anchor, index) {
        if candidate > window.end || rule.end_date.is_some_and(|end| candidate > end) {
            break;
        }
        if candidate > anchor && candidate >= window.start {
            occurrences.push(rule.occurrence_on(candidate));
            if occurrences.len() >= MAX_OCCURRENCES_PER_RULE {
                debug!(rule = %rule.id, "occurrence cap reached");
                break;
            }
        }
        index = match index.checked_add(1) {
            Some(next) => next,
            None => break,
        };
    }

    debug!(
        rule = %rule.id,
        frequency = %rule.frequency,
        window = %window,
        generated = occurrences.len(),
        "expanded recurrence rule"
    );
    occurrences
}

/// Expands every rule over the same window and returns occurrences in date order.
///
/// Occurrences sharing a date keep the order of `rules`.
pub fn expand_all(
    rules: &[RecurrenceRule],
    window: DateWindow,
    sink: &mut dyn DiagnosticSink,
) -> Vec<GeneratedOccurrence> {
    let mut all: Vec<GeneratedOccurrence> = rules
        .iter()
        .flat_map(|rule| expand(rule, window, sink))
        .collect();
    all.sort_by_key(|occurrence| occurrence.date);
    all
}

fn clamp_to_horizon(
    rule: &RecurrenceRule,
    window: DateWindow,
    sink: &mut dyn DiagnosticSink,
) -> DateWindow {
    let Some(limit) = shift_year(window.start, MAX_HORIZON_YEARS) else {
        return window;
    };
    if window.end <= limit {
        return window;
    }
    let clamped = window.clamp_end(limit);
    sink.record(Diagnostic::HorizonClamped {
        rule_id: rule.id,
        requested_end: window.end,
        clamped_end: clamped.end,
    });
    clamped
}
