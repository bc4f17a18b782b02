//! Diagnostic events raised while expanding rules and materializing windows.
//!
//! None of these conditions stop a projection. Callers choose where the
//! events go by passing a [`DiagnosticSink`].

use std::fmt;

use chrono::NaiveDate;
use flowcast_domain::MonthKey;
use uuid::Uuid;

use crate::RuleError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A rule was excluded or degraded to its anchor occurrence.
    MalformedRule { rule_id: Uuid, error: RuleError },
    /// An expansion window reached past the supported horizon and was shortened.
    HorizonClamped {
        rule_id: Uuid,
        requested_end: NaiveDate,
        clamped_end: NaiveDate,
    },
    /// A transaction id appeared twice while merging; the later copy was dropped.
    DuplicateOccurrence { id: Uuid, date: NaiveDate },
    /// A window recomputed to nothing and the previous grouping was kept.
    EmptyWindowRetained {
        requested: MonthKey,
        retained: Option<MonthKey>,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MalformedRule { rule_id, error } => {
                write!(f, "rule {rule_id}: {error}")
            }
            Diagnostic::HorizonClamped {
                rule_id,
                requested_end,
                clamped_end,
            } => write!(
                f,
                "rule {rule_id}: window end {requested_end} clamped to {clamped_end}"
            ),
            Diagnostic::DuplicateOccurrence { id, date } => {
                write!(f, "duplicate transaction {id} on {date} dropped")
            }
            Diagnostic::EmptyWindowRetained {
                requested,
                retained,
            } => match retained {
                Some(key) => write!(
                    f,
                    "window {requested} materialized empty; kept grouping from {key}"
                ),
                None => write!(
                    f,
                    "window {requested} materialized empty; kept previous grouping"
                ),
            },
        }
    }
}

/// Receives diagnostics from the generator, timeline merge and window cache.
pub trait DiagnosticSink {
    fn record(&mut self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to `tracing` at warn level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(target: "flowcast::diagnostics", "{diagnostic}");
    }
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn record(&mut self, diagnostic: Diagnostic) {
        tracing::debug!(target: "flowcast::diagnostics", "{diagnostic}");
        self.push(diagnostic);
    }
}
