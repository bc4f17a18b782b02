//! Projection orchestration: rules and ledger transactions in, timeline and
//! warnings out.

use chrono::NaiveDate;
use flowcast_domain::{
    DateWindow, ProjectionSummaryPoint, RecurrenceRule, TimelineEntry, TimelineItem, Transaction,
};
use rust_decimal::Decimal;
use tracing::info;

use crate::{
    diagnostics::DiagnosticSink,
    occurrence::expand_all,
    recurrence::ProjectionInterval,
    summary::lowest,
    timeline::{build, closing_balance, merge},
    CoreError,
};

/// Immutable snapshot handed to the projection.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionInput<'a> {
    pub transactions: &'a [Transaction],
    pub rules: &'a [RecurrenceRule],
    /// Balance at the start of the projected window.
    pub opening_balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionReport {
    pub today: NaiveDate,
    pub interval: ProjectionInterval,
    pub horizon_end: NaiveDate,
    pub opening_balance: Decimal,
    pub timeline: Vec<TimelineEntry>,
    pub lowest: Vec<ProjectionSummaryPoint>,
}

impl ProjectionReport {
    pub fn closing_balance(&self) -> Decimal {
        closing_balance(&self.timeline, self.opening_balance)
    }

    /// Timeline entries and lowest-balance points in one date-ordered list.
    ///
    /// On a shared date, transactions come before summary points.
    pub fn items(&self) -> Vec<TimelineItem> {
        let mut items: Vec<TimelineItem> = self
            .timeline
            .iter()
            .cloned()
            .map(TimelineItem::Transaction)
            .chain(self.lowest.iter().cloned().map(TimelineItem::Summary))
            .collect();
        items.sort_by_key(|item| item.date());
        items
    }
}

pub struct ProjectionService;

impl ProjectionService {
    /// Builds the timeline for `window`.
    ///
    /// Ledger transactions outside the window are ignored. Each rule
    /// contributes its anchor transaction (unless the ledger already holds a
    /// transaction with the rule's id) and its generated occurrences.
    pub fn timeline(
        input: ProjectionInput<'_>,
        window: DateWindow,
        sink: &mut dyn DiagnosticSink,
    ) -> Vec<TimelineEntry> {
        let mut ledger: Vec<Transaction> = input
            .transactions
            .iter()
            .filter(|txn| window.contains(txn.date))
            .cloned()
            .collect();
        let anchors: Vec<Transaction> = input
            .rules
            .iter()
            .filter(|rule| !input.transactions.iter().any(|txn| txn.id == rule.id))
            .filter_map(RecurrenceRule::anchor_transaction)
            .filter(|txn| window.contains(txn.date))
            .collect();
        ledger.extend(anchors);

        let occurrences = expand_all(input.rules, window, sink);
        let merged = merge(&ledger, occurrences, sink);
        build(&merged, input.opening_balance)
    }

    /// Projects from `today` to the horizon of `interval` and ranks the
    /// `lowest_count` lowest balances.
    pub fn project(
        input: ProjectionInput<'_>,
        today: NaiveDate,
        interval: ProjectionInterval,
        lowest_count: usize,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<ProjectionReport, CoreError> {
        let horizon_end = interval.horizon_end(today);
        let window = DateWindow::new(today, horizon_end)?;
        let timeline = Self::timeline(input, window, sink);
        let lowest = lowest(
            &timeline,
            input.opening_balance,
            today,
            horizon_end,
            lowest_count,
        );
        info!(
            %today,
            %interval,
            %horizon_end,
            entries = timeline.len(),
            rules = input.rules.len(),
            "projection built"
        );
        Ok(ProjectionReport {
            today,
            interval,
            horizon_end,
            opening_balance: input.opening_balance,
            timeline,
            lowest,
        })
    }
}
