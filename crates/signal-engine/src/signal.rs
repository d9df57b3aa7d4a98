//! Signal labels and the two classification strategies

use crate::error::{Result, SignalError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Categorical trading posture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    StrongBuy,
    Buy,
    Neutral,
    Sell,
    StrongSell,
}

impl Signal {
    /// All labels, most bullish first
    pub const ALL: [Signal; 5] = [
        Signal::StrongBuy,
        Signal::Buy,
        Signal::Neutral,
        Signal::Sell,
        Signal::StrongSell,
    ];

    pub fn is_bullish(self) -> bool {
        matches!(self, Signal::StrongBuy | Signal::Buy)
    }

    pub fn is_bearish(self) -> bool {
        matches!(self, Signal::Sell | Signal::StrongSell)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(SignalLabels::default().label(*self))
    }
}

/// Display text for each [`Signal`]
///
/// Some dashboards show `HOLD` where others show `NEUTRAL`; the variant stays
/// the same and only the rendered text changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalLabels {
    pub strong_buy: String,
    pub buy: String,
    pub neutral: String,
    pub sell: String,
    pub strong_sell: String,
}

impl Default for SignalLabels {
    fn default() -> Self {
        Self {
            strong_buy: "STRONG BUY".to_string(),
            buy: "BUY".to_string(),
            neutral: "NEUTRAL".to_string(),
            sell: "SELL".to_string(),
            strong_sell: "STRONG SELL".to_string(),
        }
    }
}

impl SignalLabels {
    /// Default labels with `HOLD` in place of `NEUTRAL`
    pub fn with_hold() -> Self {
        Self {
            neutral: "HOLD".to_string(),
            ..Self::default()
        }
    }

    pub fn label(&self, signal: Signal) -> &str {
        match signal {
            Signal::StrongBuy => &self.strong_buy,
            Signal::Buy => &self.buy,
            Signal::Neutral => &self.neutral,
            Signal::Sell => &self.sell,
            Signal::StrongSell => &self.strong_sell,
        }
    }

    /// Labels must be non-empty and pairwise distinct
    pub fn validate(&self) -> Result<()> {
        let labels: Vec<&str> = Signal::ALL.iter().map(|&s| self.label(s)).collect();

        if labels.iter().any(|l| l.trim().is_empty()) {
            return Err(SignalError::Configuration(
                "signal labels must not be empty".to_string(),
            ));
        }

        for (i, a) in labels.iter().enumerate() {
            if labels[i + 1..].contains(a) {
                return Err(SignalError::Configuration(format!(
                    "signal label '{a}' is used more than once"
                )));
            }
        }

        Ok(())
    }
}

/// Percent-change band edges
///
/// Bands are checked in order: `> upper_strong`, `> upper_weak`,
/// `< lower_strong`, `< lower_weak`, otherwise neutral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentThresholds {
    pub upper_strong: f64,
    pub upper_weak: f64,
    pub lower_weak: f64,
    pub lower_strong: f64,
}

impl Default for PercentThresholds {
    fn default() -> Self {
        Self::wide()
    }
}

impl PercentThresholds {
    /// Symmetric bands at `±strong` and `±weak`
    pub fn symmetric(strong: f64, weak: f64) -> Self {
        Self {
            upper_strong: strong,
            upper_weak: weak,
            lower_weak: -weak,
            lower_strong: -strong,
        }
    }

    /// ±2.5 / ±0.5
    pub fn wide() -> Self {
        Self::symmetric(2.5, 0.5)
    }

    /// ±2.0 / ±0.3
    pub fn narrow() -> Self {
        Self::symmetric(2.0, 0.3)
    }

    /// Edges must be finite and ordered `upper_strong > upper_weak > lower_weak > lower_strong`
    pub fn validate(&self) -> Result<()> {
        let edges = [
            ("upper_strong", self.upper_strong),
            ("upper_weak", self.upper_weak),
            ("lower_weak", self.lower_weak),
            ("lower_strong", self.lower_strong),
        ];

        if let Some((name, _)) = edges.iter().find(|(_, v)| !v.is_finite()) {
            return Err(SignalError::Configuration(format!(
                "threshold {name} must be a finite number"
            )));
        }

        for pair in edges.windows(2) {
            let (hi_name, hi) = pair[0];
            let (lo_name, lo) = pair[1];
            if hi <= lo {
                return Err(SignalError::Configuration(format!(
                    "threshold {hi_name} ({hi}) must be greater than {lo_name} ({lo})"
                )));
            }
        }

        Ok(())
    }
}

/// Map a percent change onto a band; first matching band wins
pub fn classify_signal(change_percent: f64, thresholds: &PercentThresholds) -> Signal {
    if change_percent > thresholds.upper_strong {
        Signal::StrongBuy
    } else if change_percent > thresholds.upper_weak {
        Signal::Buy
    } else if change_percent < thresholds.lower_strong {
        Signal::StrongSell
    } else if change_percent < thresholds.lower_weak {
        Signal::Sell
    } else {
        Signal::Neutral
    }
}

/// Rising crossover between two consecutive bars
///
/// True when the fast EMA was at or below the slow EMA on the previous bar
/// and is strictly above it on the current one.
pub fn classify_signal_from_ema(
    ema_fast: f64,
    ema_slow: f64,
    ema_fast_prev: f64,
    ema_slow_prev: f64,
) -> bool {
    ema_fast > ema_slow && ema_fast_prev <= ema_slow_prev
}

/// Entry flags for every bar of two aligned EMA series
///
/// Bar 0 never fires, and neither does a bar where either EMA is still
/// warming up at that bar or the one before it.
pub fn detect_crossovers(fast: &[Option<f64>], slow: &[Option<f64>]) -> Vec<bool> {
    let len = fast.len().min(slow.len());
    let mut flags = vec![false; len];

    for i in 1..len {
        if let (Some(f), Some(s), Some(fp), Some(sp)) = (fast[i], slow[i], fast[i - 1], slow[i - 1])
        {
            flags[i] = classify_signal_from_ema(f, s, fp, sp);
        }
    }

    flags
}
