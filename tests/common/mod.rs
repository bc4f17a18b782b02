#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use chrono::NaiveDate;
use flowcast::{
    domain::{Frequency, RecurrenceRule, Transaction, TransactionType},
    utils::persistence::{save_snapshot, Snapshot},
};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated directory that outlives the calling test.
pub fn scratch_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Salary on Monday 2025-09-01, monthly rent and weekly groceries from the same day.
pub fn household() -> Snapshot {
    let first = date(2025, 9, 1);
    Snapshot {
        opening_balance: Some(Decimal::from(500)),
        transactions: vec![Transaction::income(first, "Salary", Decimal::from(2000))],
        rules: vec![
            RecurrenceRule::new(
                first,
                Frequency::Monthly,
                "Rent",
                Decimal::from(1200),
                TransactionType::Expense,
            ),
            RecurrenceRule::new(
                first,
                Frequency::Weekly,
                "Groceries",
                Decimal::from(50),
                TransactionType::Expense,
            ),
        ],
    }
}

/// Writes `snapshot` into a fresh scratch directory and returns its path.
pub fn write_snapshot(snapshot: &Snapshot) -> PathBuf {
    let path = scratch_dir().join("snapshot.json");
    save_snapshot(snapshot, &path).expect("save snapshot");
    path
}
