//! In-memory source backed by a JSON snapshot

use crate::error::{MarketError, Result};
use crate::source::{MarketDataSource, normalize_symbol};
use async_trait::async_trait;
use signal_engine::{Bar, PriceSeries};
use std::collections::HashMap;
use std::path::Path;

/// Fixed set of series, e.g. a snapshot saved from an earlier download
///
/// The JSON layout maps each ticker to its bars:
///
/// ```json
/// { "AAPL": [ { "date": "2024-05-01", "open": 1.0, "high": 1.0, "low": 1.0, "close": 1.0, "volume": 100 } ] }
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    series: HashMap<String, PriceSeries>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a series, renaming it to its normalized symbol
    pub fn insert(&mut self, series: PriceSeries) {
        let symbol = normalize_symbol(series.symbol());
        self.series.insert(symbol.clone(), series.with_symbol(symbol));
    }

    pub fn with_series(mut self, series: PriceSeries) -> Self {
        self.insert(series);
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: HashMap<String, Vec<Bar>> = serde_json::from_str(json)?;

        let mut source = Self::new();
        for (symbol, bars) in raw {
            source.insert(PriceSeries::new(symbol, bars)?);
        }
        Ok(source)
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = tokio::fs::read_to_string(path).await?;
        Self::from_json_str(&json)
    }

    /// Symbols in the snapshot, sorted
    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.series.keys().cloned().collect();
        symbols.sort();
        symbols
    }
}

#[async_trait]
impl MarketDataSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_series(&self, symbol: &str) -> Result<PriceSeries> {
        self.series
            .get(&normalize_symbol(symbol))
            .cloned()
            .ok_or_else(|| MarketError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: "not present in snapshot".to_string(),
            })
    }
}
