use flowcast_config::ConfigError;
use flowcast_core::CoreError;
use thiserror::Error;

/// Failures surfaced by the snapshot helpers and the CLI.
#[derive(Debug, Error)]
pub enum FlowcastError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
