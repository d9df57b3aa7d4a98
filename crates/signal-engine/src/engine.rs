//! Per-symbol evaluation

use crate::config::{EmaCrossoverConfig, EngineConfig, StrategyConfig};
use crate::error::{Result, SignalError};
use crate::indicators::{check_positive_closes, compute_change_percent, compute_ema};
use crate::series::PriceSeries;
use crate::signal::{Signal, SignalLabels, classify_signal, detect_crossovers};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Display row for one evaluated symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedQuote {
    pub ticker: String,
    /// Latest close
    pub price: f64,
    /// Day-over-day change in percent, rounded to 2 decimal places
    pub change_percent: f64,
    pub signal: Signal,
}

impl RankedQuote {
    pub fn label<'a>(&self, labels: &'a SignalLabels) -> &'a str {
        labels.label(self.signal)
    }
}

/// Stateless signal evaluator holding a validated [`EngineConfig`]
#[derive(Debug, Clone)]
pub struct SignalEngine {
    config: EngineConfig,
}

impl SignalEngine {
    /// Validate the configuration up front; an invalid config never reaches a symbol
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn labels(&self) -> &SignalLabels {
        &self.config.labels
    }

    /// Evaluate a single symbol
    ///
    /// Fails with [`SignalError::DivisionByZero`] if any close in the series is
    /// not a positive number, whichever strategy is configured.
    pub fn evaluate(&self, series: &PriceSeries) -> Result<RankedQuote> {
        let required = self.config.strategy.min_bars();
        if series.len() < required {
            return Err(SignalError::DataInsufficient {
                symbol: series.symbol().to_string(),
                required,
                available: series.len(),
            });
        }

        check_positive_closes(series)?;
        let change_percent = compute_change_percent(series)?;

        let signal = match &self.config.strategy {
            StrategyConfig::PercentThreshold(thresholds) => {
                classify_signal(change_percent, thresholds)
            }
            StrategyConfig::EmaCrossover(ema) => {
                let fired = crossover_flags(series, ema)?
                    .last()
                    .copied()
                    .unwrap_or(false);
                if fired { Signal::Buy } else { Signal::Neutral }
            }
        };

        debug!(
            symbol = series.symbol(),
            change_percent,
            ?signal,
            "Evaluated symbol"
        );

        Ok(RankedQuote {
            ticker: series.symbol().to_string(),
            price: series.latest().map_or(0.0, |bar| bar.close),
            change_percent: round_2dp(change_percent),
            signal,
        })
    }

    /// Rising-crossover entry flag for every bar of the series
    ///
    /// Uses the configured EMA periods, or the default 9/21 when the engine
    /// runs in percent-threshold mode.
    pub fn entry_flags(&self, series: &PriceSeries) -> Result<Vec<bool>> {
        let ema = match &self.config.strategy {
            StrategyConfig::EmaCrossover(ema) => *ema,
            StrategyConfig::PercentThreshold(_) => EmaCrossoverConfig::default(),
        };
        crossover_flags(series, &ema)
    }
}

fn crossover_flags(series: &PriceSeries, ema: &EmaCrossoverConfig) -> Result<Vec<bool>> {
    let fast = compute_ema(series, ema.fast)?;
    let slow = compute_ema(series, ema.slow)?;
    Ok(detect_crossovers(&fast, &slow))
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::PercentThresholds;
    use chrono::NaiveDate;

    fn series(symbol: &str, closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        PriceSeries::from_closes(symbol, start, closes)
    }

    fn percent_engine() -> SignalEngine {
        SignalEngine::new(EngineConfig::default()).unwrap()
    }

    fn ema_engine(fast: usize, slow: usize) -> SignalEngine {
        SignalEngine::new(EngineConfig::builder().ema_crossover(fast, slow).build().unwrap())
            .unwrap()
    }

    #[test]
    fn test_percent_strong_buy() {
        let quote = percent_engine()
            .evaluate(&series("AAPL", &[100.0, 102.6]))
            .unwrap();

        assert_eq!(quote.ticker, "AAPL");
        assert_eq!(quote.price, 102.6);
        assert_eq!(quote.change_percent, 2.6);
        assert_eq!(quote.signal, Signal::StrongBuy);
    }

    #[test]
    fn test_percent_neutral() {
        let quote = percent_engine()
            .evaluate(&series("MSFT", &[100.0, 100.0]))
            .unwrap();
        assert_eq!(quote.change_percent, 0.0);
        assert_eq!(quote.signal, Signal::Neutral);
        assert_eq!(quote.label(&SignalLabels::with_hold()), "HOLD");
    }

    #[test]
    fn test_change_is_rounded() {
        let quote = percent_engine()
            .evaluate(&series("X", &[3.0, 3.1]))
            .unwrap();
        assert_eq!(quote.change_percent, 3.33);
    }

    #[test]
    fn test_narrow_bands() {
        let engine = SignalEngine::new(
            EngineConfig::builder()
                .percent_thresholds(PercentThresholds::narrow())
                .build()
                .unwrap(),
        )
        .unwrap();
        let quote = engine.evaluate(&series("X", &[100.0, 99.6])).unwrap();
        assert_eq!(quote.signal, Signal::Sell);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = EngineConfig {
            strategy: StrategyConfig::PercentThreshold(PercentThresholds::symmetric(1.0, 1.0)),
            ..EngineConfig::default()
        };
        assert!(matches!(
            SignalEngine::new(config),
            Err(SignalError::Configuration(_))
        ));
    }

    #[test]
    fn test_single_bar_insufficient() {
        let err = percent_engine()
            .evaluate(&series("ONE", &[10.0]))
            .unwrap_err();
        assert!(matches!(
            err,
            SignalError::DataInsufficient {
                required: 2,
                available: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_ema_crossover_fires_on_latest_bar() {
        // fast(2) and slow(3) both defined from bar 2; the fast line was below
        // the slow line on bar 3 and jumps above it on the last bar.
        let closes = [10.0, 10.0, 10.0, 9.0, 12.0];
        let engine = ema_engine(2, 3);

        let flags = engine.entry_flags(&series("X", &closes)).unwrap();
        assert_eq!(flags, vec![false, false, false, false, true]);

        let quote = engine.evaluate(&series("X", &closes)).unwrap();
        assert_eq!(quote.signal, Signal::Buy);
    }

    #[test]
    fn test_ema_no_crossover_is_neutral() {
        let closes = [10.0, 11.0, 12.0, 13.0, 14.0];
        let quote = ema_engine(2, 3).evaluate(&series("UP", &closes)).unwrap();
        assert_eq!(quote.signal, Signal::Neutral);
        assert_eq!(quote.change_percent, 7.69);
    }

    #[test]
    fn test_ema_exact_length_has_no_signal() {
        let closes = [10.0, 9.0, 14.0];
        let engine = ema_engine(2, 3);
        let quote = engine.evaluate(&series("X", &closes)).unwrap();
        assert_eq!(quote.signal, Signal::Neutral);
        assert_eq!(
            engine.entry_flags(&series("X", &closes)).unwrap(),
            vec![false, false, false]
        );
    }

    #[test]
    fn test_percent_rejects_bad_close_mid_series() {
        let err = percent_engine()
            .evaluate(&series("X", &[100.0, 0.0, -5.0, 100.0, 101.0]))
            .unwrap_err();
        assert!(matches!(err, SignalError::DivisionByZero { price, .. } if price == 0.0));
    }

    #[test]
    fn test_ema_rejects_bad_close_mid_series() {
        let engine = ema_engine(2, 3);

        for closes in [
            [f64::NAN, 10.0, 10.0, 9.0, 12.0],
            [-50.0, 10.0, 10.0, 9.0, 12.0],
            [10.0, 10.0, 0.0, 9.0, 12.0],
        ] {
            let err = engine.evaluate(&series("X", &closes)).unwrap_err();
            assert!(matches!(err, SignalError::DivisionByZero { .. }));
        }
    }

    #[test]
    fn test_ema_short_series_insufficient() {
        let err = ema_engine(9, 21)
            .evaluate(&series("X", &[1.0; 20]))
            .unwrap_err();
        assert!(matches!(
            err,
            SignalError::DataInsufficient {
                required: 21,
                available: 20,
                ..
            }
        ));
    }
}
