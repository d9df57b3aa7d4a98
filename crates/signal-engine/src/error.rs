//! Error types for signal evaluation

use thiserror::Error;

/// Signal engine errors
///
/// Everything except [`SignalError::Configuration`] is scoped to a single
/// symbol; batch evaluation records those and moves on to the next symbol.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalError {
    /// Not enough bars for the requested computation
    #[error("Insufficient data for {symbol}: need {required} bars, have {available}")]
    DataInsufficient {
        symbol: String,
        required: usize,
        available: usize,
    },

    /// A price used as a divisor is zero, negative or not a number
    #[error("Division by zero for {symbol}: non-positive price {price}")]
    DivisionByZero { symbol: String, price: f64 },

    /// Bar dates are not strictly increasing
    #[error("Series for {symbol} is not ordered by date at bar {index}")]
    UnorderedSeries { symbol: String, index: usize },

    /// Malformed thresholds, periods or labels
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl SignalError {
    /// Whether a batch may skip the offending symbol and continue
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, SignalError::Configuration(_))
    }

    /// Symbol the error is attached to, if any
    pub fn symbol(&self) -> Option<&str> {
        match self {
            SignalError::DataInsufficient { symbol, .. }
            | SignalError::DivisionByZero { symbol, .. }
            | SignalError::UnorderedSeries { symbol, .. } => Some(symbol),
            SignalError::Configuration(_) => None,
        }
    }
}

/// Result type alias for signal operations
pub type Result<T> = std::result::Result<T, SignalError>;
