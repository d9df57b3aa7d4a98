//! Market-data sources for the signal engine
//!
//! Everything that talks to the outside world before a signal can be computed:
//!
//! - [`MarketDataSource`]: async contract producing a [`PriceSeries`] per symbol
//! - [`YahooSource`]: daily bars from Yahoo Finance, rate limited
//! - [`StaticSource`]: in-memory or JSON-file snapshot, for offline runs and tests
//! - [`CachedSource`]: TTL cache in front of any source
//! - [`fetch_snapshot`]: bounded-concurrency fan-out with per-symbol failure isolation
//!
//! # Example
//!
//! ```rust,ignore
//! use signal_market::{CachedSource, MarketConfig, YahooSource, fetch_snapshot};
//!
//! let config = MarketConfig::default().with_env()?;
//! let source = CachedSource::new(YahooSource::new(&config)?, &config);
//! let snapshot = fetch_snapshot(&source, &["AAPL".to_string()], config.max_concurrency).await;
//! ```
//!
//! [`PriceSeries`]: signal_engine::PriceSeries

pub mod cache;
pub mod config;
pub mod error;
pub mod source;
pub mod static_source;
pub mod yahoo;

pub use cache::{CacheKey, CachedSource};
pub use config::{MarketConfig, SUPPORTED_RANGES};
pub use error::{MarketError, Result};
pub use source::{MarketDataSource, Snapshot, fetch_snapshot, normalize_symbol};
pub use static_source::StaticSource;
pub use yahoo::YahooSource;
