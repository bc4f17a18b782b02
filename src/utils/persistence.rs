use std::{fs, path::Path};

use flowcast_domain::{RecurrenceRule, Transaction};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::FlowcastError;

/// Ledger transactions and recurrence rules as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Falls back to the configured opening balance when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_balance: Option<Decimal>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub rules: Vec<RecurrenceRule>,
}

/// Writes the snapshot to disk atomically by staging to a temporary file.
pub fn save_snapshot(snapshot: &Snapshot, path: &Path) -> Result<(), FlowcastError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(&tmp, json)?;
    fs::rename(tmp, path)?;
    debug!(path = %path.display(), "snapshot saved");
    Ok(())
}

/// Loads a snapshot from disk, returning structured errors on failure.
pub fn load_snapshot(path: &Path) -> Result<Snapshot, FlowcastError> {
    let data = fs::read_to_string(path)?;
    let snapshot: Snapshot = serde_json::from_str(&data)?;
    debug!(
        path = %path.display(),
        transactions = snapshot.transactions.len(),
        rules = snapshot.rules.len(),
        "snapshot loaded"
    );
    Ok(snapshot)
}
