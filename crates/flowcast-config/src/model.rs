use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// User preferences that seed projections run from the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    /// Used when a snapshot does not carry its own opening balance.
    #[serde(default)]
    pub opening_balance: Decimal,
    #[serde(default = "Config::default_projection_interval")]
    pub projection_interval: String,
    #[serde(default = "Config::default_lowest_balance_count")]
    pub lowest_balance_count: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional snapshot file. Defaults to `~/Documents/Flowcast/snapshot.json`.
    pub snapshot_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            opening_balance: Decimal::ZERO,
            projection_interval: Self::default_projection_interval(),
            lowest_balance_count: Self::default_lowest_balance_count(),
            snapshot_path: None,
        }
    }
}

impl Config {
    pub fn default_projection_interval() -> String {
        "monthly".into()
    }

    pub fn default_lowest_balance_count() -> usize {
        3
    }

    pub fn resolve_snapshot_path(&self) -> PathBuf {
        if let Some(path) = &self.snapshot_path {
            return path.clone();
        }

        let base = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join("Flowcast").join("snapshot.json")
    }
}
