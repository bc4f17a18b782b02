//! Recurrence rules and the occurrences they expand into.

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::transaction::{Transaction, TransactionType};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// A recurring cash-flow definition anchored on a reference date.
pub struct RecurrenceRule {
    pub id: Uuid,
    pub description: String,
    pub amount: Decimal,
    #[serde(default)]
    pub category: String,
    #[serde(rename = "type", default)]
    pub kind: TransactionType,
    #[serde(default)]
    pub anchor_date: Option<NaiveDate>,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default = "RecurrenceRule::default_interval")]
    pub interval: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_day_of_month: Option<u32>,
    #[serde(default)]
    pub last_day_of_month: bool,
    #[serde(default)]
    pub last_weekday_of_month: bool,
}

impl RecurrenceRule {
    pub fn new(
        anchor_date: NaiveDate,
        frequency: Frequency,
        description: impl Into<String>,
        amount: Decimal,
        kind: TransactionType,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            amount,
            category: String::new(),
            kind,
            anchor_date: Some(anchor_date),
            frequency,
            interval: 1,
            end_date: None,
            monthly_day_of_month: None,
            last_day_of_month: false,
            last_weekday_of_month: false,
        }
    }

    pub fn default_interval() -> u32 {
        1
    }

    pub fn with_interval(mut self, interval: u32) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn on_day_of_month(mut self, day: u32) -> Self {
        self.monthly_day_of_month = Some(day);
        self
    }

    pub fn on_last_day_of_month(mut self) -> Self {
        self.last_day_of_month = true;
        self.last_weekday_of_month = false;
        self
    }

    pub fn on_last_weekday_of_month(mut self) -> Self {
        self.last_weekday_of_month = true;
        self.last_day_of_month = false;
        self
    }

    /// Interval with the `0` case folded into `1`.
    pub fn step(&self) -> u32 {
        self.interval.max(1)
    }

    /// Day of month targeted by monthly rules before clamping.
    pub fn target_day(&self, anchor: NaiveDate) -> u32 {
        self.monthly_day_of_month
            .filter(|day| *day >= 1)
            .unwrap_or_else(|| anchor.day())
    }

    /// The rule's own transaction on its anchor date, sharing the rule id.
    pub fn anchor_transaction(&self) -> Option<Transaction> {
        let anchor = self.anchor_date?;
        Some(Transaction {
            id: self.id,
            date: anchor,
            description: self.description.clone(),
            amount: self.amount.abs(),
            kind: self.kind,
            category: self.category.clone(),
            rule_id: Some(self.id),
        })
    }

    /// Builds the occurrence of this rule on `date`.
    pub fn occurrence_on(&self, date: NaiveDate) -> GeneratedOccurrence {
        let id = occurrence_id(self.id, date);
        GeneratedOccurrence {
            rule_id: self.id,
            date,
            transaction: Transaction {
                id,
                date,
                description: self.description.clone(),
                amount: self.amount.abs(),
                kind: self.kind,
                category: self.category.clone(),
                rule_id: Some(self.id),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
/// Repetition cadence of a [`RecurrenceRule`].
pub enum Frequency {
    #[default]
    Once,
    Daily,
    Weekly,
    #[serde(alias = "biweekly")]
    BiWeekly,
    Monthly,
    Yearly,
    /// Any cadence this engine does not recognise.
    #[serde(other)]
    Unknown,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Frequency::Once => "once",
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::BiWeekly => "bi-weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
            Frequency::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Ephemeral transaction projected from a rule; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedOccurrence {
    pub rule_id: Uuid,
    pub date: NaiveDate,
    pub transaction: Transaction,
}

impl GeneratedOccurrence {
    pub fn id(&self) -> Uuid {
        self.transaction.id
    }

    pub fn into_transaction(self) -> Transaction {
        self.transaction
    }
}

/// Deterministic id for the occurrence of `rule_id` on `date`.
pub fn occurrence_id(rule_id: Uuid, date: NaiveDate) -> Uuid {
    let millis = date.and_time(NaiveTime::MIN).and_utc().timestamp_millis();
    Uuid::new_v5(&rule_id, millis.to_string().as_bytes())
}
