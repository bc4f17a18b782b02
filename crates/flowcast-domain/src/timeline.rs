//! Values produced by the projection engine for presentation.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::transaction::Transaction;

/// A transaction placed on the timeline with the balance right after it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimelineEntry {
    pub transaction: Transaction,
    pub balance: Decimal,
}

impl TimelineEntry {
    pub fn date(&self) -> NaiveDate {
        self.transaction.date
    }
}

/// Synthetic point used by the lowest-balance warning list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectionSummaryPoint {
    pub date: NaiveDate,
    pub balance: Decimal,
    pub label: String,
}

/// Anything the presentation layer may list alongside the timeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimelineItem {
    Transaction(TimelineEntry),
    Summary(ProjectionSummaryPoint),
}

impl TimelineItem {
    pub fn date(&self) -> NaiveDate {
        match self {
            TimelineItem::Transaction(entry) => entry.date(),
            TimelineItem::Summary(point) => point.date,
        }
    }

    pub fn balance(&self) -> Decimal {
        match self {
            TimelineItem::Transaction(entry) => entry.balance,
            TimelineItem::Summary(point) => point.balance,
        }
    }
}

/// Timeline entries keyed by calendar day, days ascending.
pub type DayGroups = BTreeMap<NaiveDate, Vec<TimelineEntry>>;
