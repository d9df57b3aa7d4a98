//! Configuration for signal evaluation

use crate::error::{Result, SignalError};
use crate::signal::{PercentThresholds, SignalLabels};
use serde::{Deserialize, Serialize};

/// Fast/slow EMA periods for crossover mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmaCrossoverConfig {
    pub fast: usize,
    pub slow: usize,
}

impl Default for EmaCrossoverConfig {
    fn default() -> Self {
        Self { fast: 9, slow: 21 }
    }
}

impl EmaCrossoverConfig {
    pub fn validate(&self) -> Result<()> {
        if self.fast == 0 {
            return Err(SignalError::Configuration(
                "fast EMA period must be greater than 0".to_string(),
            ));
        }
        if self.fast >= self.slow {
            return Err(SignalError::Configuration(format!(
                "fast EMA period ({}) must be less than slow period ({})",
                self.fast, self.slow
            )));
        }
        Ok(())
    }
}

/// Which classification rule produces the signal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum StrategyConfig {
    /// Band the day-over-day percent change
    PercentThreshold(PercentThresholds),
    /// Fire on a rising fast/slow EMA crossover at the latest bar
    EmaCrossover(EmaCrossoverConfig),
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self::PercentThreshold(PercentThresholds::default())
    }
}

impl StrategyConfig {
    /// Minimum number of bars a symbol needs under this strategy
    pub fn min_bars(&self) -> usize {
        match self {
            StrategyConfig::PercentThreshold(_) => 2,
            StrategyConfig::EmaCrossover(ema) => ema.slow.max(2),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            StrategyConfig::PercentThreshold(thresholds) => thresholds.validate(),
            StrategyConfig::EmaCrossover(ema) => ema.validate(),
        }
    }
}

/// Configuration for the signal engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Classification strategy
    #[serde(default)]
    pub strategy: StrategyConfig,

    /// Display text for each signal
    #[serde(default)]
    pub labels: SignalLabels,

    /// Evaluate symbols on the rayon thread pool
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_parallel() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyConfig::default(),
            labels: SignalLabels::default(),
            parallel: default_parallel(),
        }
    }
}

impl EngineConfig {
    /// Create a new configuration builder
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Parse and validate a JSON configuration document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SignalError::Configuration(format!("invalid engine config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.strategy.validate()?;
        self.labels.validate()
    }
}

/// Builder for EngineConfig
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    strategy: Option<StrategyConfig>,
    labels: Option<SignalLabels>,
    parallel: Option<bool>,
}

impl EngineConfigBuilder {
    /// Set the classification strategy
    pub fn strategy(mut self, strategy: StrategyConfig) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Use percent-threshold mode with the given bands
    pub fn percent_thresholds(self, thresholds: PercentThresholds) -> Self {
        self.strategy(StrategyConfig::PercentThreshold(thresholds))
    }

    /// Use EMA-crossover mode with the given periods
    pub fn ema_crossover(self, fast: usize, slow: usize) -> Self {
        self.strategy(StrategyConfig::EmaCrossover(EmaCrossoverConfig { fast, slow }))
    }

    /// Set display labels
    pub fn labels(mut self, labels: SignalLabels) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Toggle parallel batch evaluation
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = Some(parallel);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<EngineConfig> {
        let defaults = EngineConfig::default();

        let config = EngineConfig {
            strategy: self.strategy.unwrap_or(defaults.strategy),
            labels: self.labels.unwrap_or(defaults.labels),
            parallel: self.parallel.unwrap_or(defaults.parallel),
        };

        config.validate()?;
        Ok(config)
    }
}
