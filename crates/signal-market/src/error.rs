//! Error types for market-data retrieval

use signal_engine::{FailureKind, SignalError};
use thiserror::Error;

/// Market-data specific errors
#[derive(Debug, Error)]
pub enum MarketError {
    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinanceError(String),

    /// Data not available for the requested symbol
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    /// Unsupported history range
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Fetched bars do not form a valid series
    #[error(transparent)]
    Series(#[from] SignalError),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Snapshot file could not be read
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl MarketError {
    /// Failure category recorded when this error skips a symbol
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            MarketError::Series(e) => FailureKind::from(e),
            MarketError::InvalidRange(_) | MarketError::ConfigError(_) => FailureKind::Configuration,
            MarketError::YahooFinanceError(_)
            | MarketError::DataUnavailable { .. }
            | MarketError::JsonError(_)
            | MarketError::IoError(_) => FailureKind::Fetch,
        }
    }
}

/// Result type alias for market-data operations
pub type Result<T> = std::result::Result<T, MarketError>;
