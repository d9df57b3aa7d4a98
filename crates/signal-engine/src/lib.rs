//! Signal engine for daily stock quotes
//!
//! Turns a per-symbol price history into a categorical trading signal. Two
//! interchangeable strategies are supported:
//!
//! - Percent-threshold mode: bands the day-over-day percent change of the
//!   latest close into STRONG BUY / BUY / NEUTRAL / SELL / STRONG SELL
//! - EMA-crossover mode: fires BUY on the bar where the fast EMA rises
//!   strictly above the slow EMA
//!
//! Everything here is pure and synchronous. Market data comes in as
//! [`PriceSeries`] values; results go out as [`RankedQuote`] rows collected in
//! a [`BatchReport`].
//!
//! # Example
//!
//! ```rust
//! use signal_engine::{EngineConfig, PriceSeries, Signal, SignalEngine};
//! use chrono::NaiveDate;
//!
//! let engine = SignalEngine::new(EngineConfig::default()).unwrap();
//! let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
//! let series = PriceSeries::from_closes("AAPL", start, &[100.0, 102.6]);
//!
//! let quote = engine.evaluate(&series).unwrap();
//! assert_eq!(quote.signal, Signal::StrongBuy);
//! assert_eq!(quote.change_percent, 2.6);
//! ```

pub mod batch;
pub mod config;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod series;
pub mod signal;

pub use batch::{BatchReport, BatchStatus, FailureKind, SymbolFailure, evaluate_batch};
pub use config::{EmaCrossoverConfig, EngineConfig, StrategyConfig};
pub use engine::{RankedQuote, SignalEngine};
pub use error::{Result, SignalError};
pub use indicators::{check_positive_closes, compute_change_percent, compute_ema, ema_of};
pub use series::{Bar, PriceSeries};
pub use signal::{
    PercentThresholds, Signal, SignalLabels, classify_signal, classify_signal_from_ema,
    detect_crossovers,
};
