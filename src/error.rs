// Error types for network optimization runs

use thiserror::Error;

/// Main error type for warehouse network operations
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Scenario parameters that cannot produce any configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Demand records that are missing, malformed or negative
    #[error("Invalid demand input: {0}")]
    InvalidDemand(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for warehouse network operations
pub type Result<T> = std::result::Result<T, NetworkError>;
