//! TTL cache in front of a market-data source

use crate::config::MarketConfig;
use crate::error::Result;
use crate::source::MarketDataSource;
use async_trait::async_trait;
use cached::{Cached, TimedCache};
use signal_engine::PriceSeries;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Cache key for a series request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Stock symbol
    pub symbol: String,
    /// History range the series was fetched with
    pub range: String,
}

impl CacheKey {
    /// Create a new cache key
    pub fn new(symbol: impl Into<String>, range: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            range: range.into(),
        }
    }
}

/// Wraps a source so repeated requests within the TTL are served from memory
///
/// Only successful fetches are cached; a failed symbol is retried on the
/// next request.
pub struct CachedSource<S> {
    inner: S,
    range: String,
    cache: Arc<RwLock<TimedCache<CacheKey, PriceSeries>>>,
}

impl<S: MarketDataSource> CachedSource<S> {
    /// Cache `inner` for `config.cache_ttl`
    pub fn new(inner: S, config: &MarketConfig) -> Self {
        Self::with_ttl(inner, config.history_range.clone(), config.cache_ttl)
    }

    pub fn with_ttl(inner: S, range: impl Into<String>, ttl: Duration) -> Self {
        Self {
            inner,
            range: range.into(),
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    async fn get(&self, key: &CacheKey) -> Option<PriceSeries> {
        let mut cache = self.cache.write().await;
        cache.cache_get(key).cloned()
    }

    async fn insert(&self, key: CacheKey, value: PriceSeries) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key, value);
    }

    /// Invalidate a specific cache entry
    pub async fn invalidate(&self, symbol: &str) {
        let key = CacheKey::new(symbol, self.range.clone());
        let mut cache = self.cache.write().await;
        let _ = cache.cache_remove(&key);
    }

    /// Clear all cached entries
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.cache_clear();
    }

    /// Get the number of cached entries
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cache_size()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl<S: MarketDataSource> MarketDataSource for CachedSource<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn fetch_series(&self, symbol: &str) -> Result<PriceSeries> {
        let key = CacheKey::new(symbol, self.range.clone());

        if let Some(series) = self.get(&key).await {
            tracing::debug!("Cache hit for key: {:?}", key);
            return Ok(series);
        }

        tracing::debug!("Cache miss for key: {:?}", key);

        let series = self.inner.fetch_series(symbol).await?;
        self.insert(key, series.clone()).await;

        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MarketError;
    use crate::source::{MockMarketDataSource, fetch_snapshot};
    use chrono::NaiveDate;

    fn sample(symbol: &str) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        PriceSeries::from_closes(symbol, start, &[10.0, 11.0])
    }

    #[tokio::test]
    async fn test_second_fetch_hits_cache() {
        let mut inner = MockMarketDataSource::new();
        inner
            .expect_fetch_series()
            .withf(|symbol| symbol.to_string() == "AAPL")
            .times(1)
            .returning(|symbol| Ok(sample(symbol)));

        let source = CachedSource::with_ttl(inner, "5d", Duration::from_secs(60));

        let first = source.fetch_series("AAPL").await.unwrap();
        let second = source.fetch_series("AAPL").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(source.len().await, 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let mut inner = MockMarketDataSource::new();
        inner.expect_fetch_series().times(2).returning(|symbol| {
            Err(MarketError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: "timeout".to_string(),
            })
        });

        let source = CachedSource::with_ttl(inner, "5d", Duration::from_secs(60));
        assert!(source.fetch_series("AAPL").await.is_err());
        assert!(source.fetch_series("AAPL").await.is_err());
        assert!(source.is_empty().await);
    }

    #[tokio::test]
    async fn test_invalidate_and_clear() {
        let mut inner = MockMarketDataSource::new();
        inner
            .expect_fetch_series()
            .times(4)
            .returning(|symbol| Ok(sample(symbol)));

        let source = CachedSource::with_ttl(inner, "5d", Duration::from_secs(60));
        let symbols: Vec<String> = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();

        let snapshot = fetch_snapshot(&source, &symbols, 3).await;
        assert_eq!(snapshot.len(), 3);
        assert_eq!(source.len().await, 3);

        source.invalidate("A").await;
        assert_eq!(source.len().await, 2);
        source.fetch_series("A").await.unwrap();
        source.fetch_series("B").await.unwrap();

        source.clear().await;
        assert!(source.is_empty().await);
    }

    #[tokio::test]
    async fn test_expired_entry_is_refetched() {
        let mut inner = MockMarketDataSource::new();
        inner
            .expect_fetch_series()
            .times(2)
            .returning(|symbol| Ok(sample(symbol)));

        let source = CachedSource::with_ttl(inner, "5d", Duration::from_secs(1));
        source.fetch_series("AAPL").await.unwrap();
        tokio::time::sleep(Duration::from_millis(1100)).await;
        source.fetch_series("AAPL").await.unwrap();
    }
}
