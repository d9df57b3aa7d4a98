//! Daily price history for a single symbol

use crate::error::{Result, SignalError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: u64,
}

impl Bar {
    /// Bar with every price set to `close`
    ///
    /// Handy when only closes are known (tests, snapshots built from close-only feeds).
    pub fn from_close(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: 0,
        }
    }
}

/// Bars for one symbol, ordered by strictly increasing date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Build a series, rejecting bars whose dates do not strictly increase
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self> {
        let symbol = symbol.into();

        if let Some(index) = bars
            .windows(2)
            .position(|pair| pair[1].date <= pair[0].date)
        {
            return Err(SignalError::UnorderedSeries {
                symbol,
                index: index + 1,
            });
        }

        Ok(Self { symbol, bars })
    }

    /// Build a series of close-only bars on consecutive calendar days from `start`
    pub fn from_closes(symbol: impl Into<String>, start: NaiveDate, closes: &[f64]) -> Self {
        let bars = start
            .iter_days()
            .zip(closes)
            .map(|(date, &close)| Bar::from_close(date, close))
            .collect();

        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    /// Same bars under a different symbol
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Closing prices in date order
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }

    /// Most recent bar
    pub fn latest(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Bar immediately before the most recent one
    pub fn previous(&self) -> Option<&Bar> {
        self.bars.len().checked_sub(2).map(|i| &self.bars[i])
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

#[derive(Deserialize)]
struct RawSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl<'de> Deserialize<'de> for PriceSeries {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawSeries::deserialize(deserializer)?;
        PriceSeries::new(raw.symbol, raw.bars).map_err(serde::de::Error::custom)
    }
}
