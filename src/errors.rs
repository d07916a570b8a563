use thiserror::Error;

/// Error type for persistence, configuration and snapshot handling.
#[derive(Debug, Error)]
pub enum InsightsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),
}
