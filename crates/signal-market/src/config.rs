//! Configuration for market-data retrieval

use crate::error::{MarketError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// History ranges accepted by the Yahoo chart endpoint
pub const SUPPORTED_RANGES: [&str; 11] = [
    "1d", "5d", "1mo", "3mo", "6mo", "1y", "2y", "5y", "10y", "ytd", "max",
];

/// Configuration for market-data sources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketConfig {
    /// How long a fetched series stays valid
    pub cache_ttl: Duration,

    /// Daily-bar history requested per symbol
    pub history_range: String,

    /// Maximum symbols fetched concurrently
    pub max_concurrency: usize,

    /// Request rate limit against the provider
    pub requests_per_second: u32,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(3600), // 1 hour
            history_range: "5d".to_string(),
            max_concurrency: 8,
            requests_per_second: 5,
        }
    }
}

impl MarketConfig {
    /// Create a new configuration builder
    pub fn builder() -> MarketConfigBuilder {
        MarketConfigBuilder::default()
    }

    /// Apply `SIGNAL_CACHE_TTL_SECS` and `SIGNAL_HISTORY_RANGE` overrides
    pub fn with_env(mut self) -> Result<Self> {
        if let Ok(secs) = std::env::var("SIGNAL_CACHE_TTL_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                MarketError::ConfigError(format!("SIGNAL_CACHE_TTL_SECS is not a number: {secs}"))
            })?;
            self.cache_ttl = Duration::from_secs(secs);
        }
        if let Ok(range) = std::env::var("SIGNAL_HISTORY_RANGE") {
            self.history_range = range.trim().to_string();
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !SUPPORTED_RANGES.contains(&self.history_range.as_str()) {
            return Err(MarketError::InvalidRange(format!(
                "{} (supported: {})",
                self.history_range,
                SUPPORTED_RANGES.join(", ")
            )));
        }

        if self.cache_ttl.is_zero() {
            return Err(MarketError::ConfigError(
                "cache_ttl must be greater than 0".to_string(),
            ));
        }

        if self.max_concurrency == 0 {
            return Err(MarketError::ConfigError(
                "max_concurrency must be greater than 0".to_string(),
            ));
        }

        if self.requests_per_second == 0 {
            return Err(MarketError::ConfigError(
                "requests_per_second must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for MarketConfig
#[derive(Debug, Default)]
pub struct MarketConfigBuilder {
    cache_ttl: Option<Duration>,
    history_range: Option<String>,
    max_concurrency: Option<usize>,
    requests_per_second: Option<u32>,
}

impl MarketConfigBuilder {
    /// Set cache TTL
    pub fn cache_ttl(mut self, duration: Duration) -> Self {
        self.cache_ttl = Some(duration);
        self
    }

    /// Set history range, e.g. "5d" or "3mo"
    pub fn history_range(mut self, range: impl Into<String>) -> Self {
        self.history_range = Some(range.into());
        self
    }

    /// Set maximum concurrent fetches
    pub fn max_concurrency(mut self, n: usize) -> Self {
        self.max_concurrency = Some(n);
        self
    }

    /// Set provider rate limit
    pub fn requests_per_second(mut self, n: u32) -> Self {
        self.requests_per_second = Some(n);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<MarketConfig> {
        let defaults = MarketConfig::default();

        let config = MarketConfig {
            cache_ttl: self.cache_ttl.unwrap_or(defaults.cache_ttl),
            history_range: self.history_range.unwrap_or(defaults.history_range),
            max_concurrency: self.max_concurrency.unwrap_or(defaults.max_concurrency),
            requests_per_second: self
                .requests_per_second
                .unwrap_or(defaults.requests_per_second),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MarketConfig::default();
        assert_eq!(config.cache_ttl, Duration::from_secs(3600));
        assert_eq!(config.history_range, "5d");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = MarketConfig::builder()
            .cache_ttl(Duration::from_secs(900))
            .history_range("3mo")
            .max_concurrency(4)
            .build()
            .unwrap();

        assert_eq!(config.cache_ttl, Duration::from_secs(900));
        assert_eq!(config.history_range, "3mo");
        assert_eq!(config.max_concurrency, 4);
        assert_eq!(config.requests_per_second, 5);
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            MarketConfig::builder().history_range("2d").build(),
            Err(MarketError::InvalidRange(_))
        ));
        assert!(MarketConfig::builder().max_concurrency(0).build().is_err());
        assert!(MarketConfig::builder().requests_per_second(0).build().is_err());
        assert!(
            MarketConfig::builder()
                .cache_ttl(Duration::ZERO)
                .build()
                .is_err()
        );
    }
}
