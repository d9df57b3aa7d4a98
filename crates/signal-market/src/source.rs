//! Market-data source contract and batch fetching

use crate::error::Result;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use signal_engine::{PriceSeries, SymbolFailure};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

/// Anything that can produce a daily [`PriceSeries`] for a symbol
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Provider name for logs and reports
    fn name(&self) -> &str;

    /// Fetch the daily history for one (already normalized) symbol
    async fn fetch_series(&self, symbol: &str) -> Result<PriceSeries>;
}

/// Immutable set of series for one evaluation pass
#[derive(Debug, Default)]
pub struct Snapshot {
    pub series: HashMap<String, PriceSeries>,
    /// Symbols whose fetch failed, sorted by symbol
    pub failures: Vec<SymbolFailure>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Upper-case a ticker and use `-` as the share-class separator (`brk.b` -> `BRK-B`)
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase().replace('.', "-")
}

/// Fetch many symbols with at most `max_concurrency` requests in flight
///
/// Symbols are normalized and de-duplicated first. A failed fetch lands in
/// [`Snapshot::failures`] and does not affect the other symbols.
pub async fn fetch_snapshot<S>(source: &S, symbols: &[String], max_concurrency: usize) -> Snapshot
where
    S: MarketDataSource + ?Sized,
{
    let symbols: BTreeSet<String> = symbols
        .iter()
        .map(|s| normalize_symbol(s))
        .filter(|s| !s.is_empty())
        .collect();

    debug!(count = symbols.len(), "Fetching market snapshot");

    let results: Vec<_> = stream::iter(symbols)
        .map(|symbol| async move {
            let result = source.fetch_series(&symbol).await;
            (symbol, result)
        })
        .buffer_unordered(max_concurrency.max(1))
        .collect()
        .await;

    let mut snapshot = Snapshot::default();
    for (symbol, result) in results {
        match result {
            Ok(series) => {
                snapshot.series.insert(symbol, series);
            }
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "Failed to fetch symbol");
                let kind = e.failure_kind();
                snapshot.failures.push(SymbolFailure::new(symbol, kind, e.to_string()));
            }
        }
    }
    snapshot.failures.sort_by(|a, b| a.symbol.cmp(&b.symbol));

    snapshot
}
