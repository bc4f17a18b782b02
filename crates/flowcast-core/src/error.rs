use flowcast_domain::DateWindowError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid window: {0}")]
    InvalidWindow(#[from] DateWindowError),
    #[error("Unknown projection interval: {0}")]
    UnknownInterval(String),
}

/// Reasons a recurrence rule cannot be expanded as written.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("rule has no anchor date")]
    MissingAnchor,
    #[error("rule frequency is not recognised")]
    UnknownFrequency,
    #[error("rule sets both last-day and last-weekday of month")]
    ConflictingMonthEnd,
}
