//! Yahoo Finance daily-bar source

use crate::config::MarketConfig;
use crate::error::{MarketError, Result};
use crate::source::MarketDataSource;
use async_trait::async_trait;
use chrono::DateTime;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use signal_engine::{Bar, PriceSeries};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::debug;
use yahoo_finance_api as yahoo;

/// Yahoo Finance client producing daily [`PriceSeries`]
pub struct YahooSource {
    connector: yahoo::YahooConnector,
    range: String,
    limiter: Arc<DefaultDirectRateLimiter>,
}

/// Quote fields needed to build a bar
#[derive(Debug, Clone, Copy)]
struct RawQuote {
    timestamp: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
}

impl From<&yahoo::Quote> for RawQuote {
    fn from(q: &yahoo::Quote) -> Self {
        Self {
            timestamp: q.timestamp as i64,
            open: q.open,
            high: q.high,
            low: q.low,
            close: q.close,
            volume: q.volume,
        }
    }
}

impl YahooSource {
    /// Create a new Yahoo Finance source
    pub fn new(config: &MarketConfig) -> Result<Self> {
        config.validate()?;

        let connector = yahoo::YahooConnector::new()
            .map_err(|e| MarketError::YahooFinanceError(e.to_string()))?;

        let per_second = NonZeroU32::new(config.requests_per_second).ok_or_else(|| {
            MarketError::ConfigError("requests_per_second must be greater than 0".to_string())
        })?;

        Ok(Self {
            connector,
            range: config.history_range.clone(),
            limiter: Arc::new(RateLimiter::direct(Quota::per_second(per_second))),
        })
    }

    pub fn range(&self) -> &str {
        &self.range
    }
}

/// Convert raw quotes into one bar per trading day
///
/// Quotes without a usable timestamp or with a non-finite close are dropped.
/// When two quotes fall on the same day (an intraday quote appended after the
/// daily bar) the later one wins.
fn bars_from_quotes(quotes: impl IntoIterator<Item = RawQuote>) -> Vec<Bar> {
    let mut bars: Vec<Bar> = Vec::new();

    for q in quotes {
        if !q.close.is_finite() {
            continue;
        }
        let Some(timestamp) = DateTime::from_timestamp(q.timestamp, 0) else {
            continue;
        };

        let bar = Bar {
            date: timestamp.date_naive(),
            open: q.open,
            high: q.high,
            low: q.low,
            close: q.close,
            volume: q.volume,
        };

        if let Some(last) = bars.last_mut() {
            if last.date == bar.date {
                *last = bar;
                continue;
            }
            if last.date > bar.date {
                continue;
            }
        }
        bars.push(bar);
    }

    bars
}

#[async_trait]
impl MarketDataSource for YahooSource {
    fn name(&self) -> &str {
        "yahoo"
    }

    async fn fetch_series(&self, symbol: &str) -> Result<PriceSeries> {
        self.limiter.until_ready().await;

        debug!(symbol, range = %self.range, "Requesting Yahoo Finance history");

        let response = self
            .connector
            .get_quote_range(symbol, "1d", &self.range)
            .await
            .map_err(|e| MarketError::YahooFinanceError(e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| MarketError::YahooFinanceError(e.to_string()))?;

        let bars = bars_from_quotes(quotes.iter().map(RawQuote::from));
        if bars.is_empty() {
            return Err(MarketError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: "No historical data available".to_string(),
            });
        }

        Ok(PriceSeries::new(symbol, bars)?)
    }
}
