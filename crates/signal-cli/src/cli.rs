//! Command-line arguments and how they map onto engine and market configuration

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use signal_engine::{
    EmaCrossoverConfig, EngineConfig, PercentThresholds, SignalLabels, StrategyConfig,
};
use signal_market::MarketConfig;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Band the day-over-day percent change
    Percent,
    /// Rising fast/slow EMA crossover
    Ema,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    /// LLM commentary prompt built from the ranked movers
    Prompt,
}

#[derive(Parser, Debug)]
#[command(name = "signal-scan")]
#[command(about = "Rank symbols by daily move and classify a trading signal", long_about = None)]
pub struct Args {
    /// Comma-separated tickers, e.g. AAPL,MSFT,BRK.B
    #[arg(short, long, value_delimiter = ',')]
    pub tickers: Vec<String>,

    /// File with one ticker per line ('#' starts a comment)
    #[arg(long)]
    pub tickers_file: Option<PathBuf>,

    /// Read bars from a JSON snapshot instead of Yahoo Finance
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Engine configuration file (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Classification strategy
    #[arg(short, long, value_enum)]
    pub mode: Option<Mode>,

    /// Strong band edge in percent (symmetric)
    #[arg(long)]
    pub strong: Option<f64>,

    /// Weak band edge in percent (symmetric)
    #[arg(long)]
    pub weak: Option<f64>,

    /// Fast EMA period
    #[arg(long)]
    pub fast: Option<usize>,

    /// Slow EMA period
    #[arg(long)]
    pub slow: Option<usize>,

    /// Show HOLD instead of NEUTRAL
    #[arg(long)]
    pub hold: bool,

    /// Evaluate symbols on a single thread
    #[arg(long)]
    pub sequential: bool,

    /// Yahoo history range (defaults to 5d, or 3mo in EMA mode)
    #[arg(long)]
    pub range: Option<String>,

    /// Limit table rows and prompt movers
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Debug-level logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

impl Args {
    /// Apply command-line overrides on top of a base configuration
    pub fn engine_config(&self, base: EngineConfig) -> Result<EngineConfig> {
        let mut config = base;

        let mode = self.mode.or_else(|| {
            if self.fast.is_some() || self.slow.is_some() {
                Some(Mode::Ema)
            } else if self.strong.is_some() || self.weak.is_some() {
                Some(Mode::Percent)
            } else {
                None
            }
        });

        match mode {
            Some(Mode::Percent) => {
                let current = match config.strategy {
                    StrategyConfig::PercentThreshold(t) => t,
                    StrategyConfig::EmaCrossover(_) => PercentThresholds::default(),
                };
                let thresholds = match (self.strong, self.weak) {
                    (None, None) => current,
                    (strong, weak) => PercentThresholds::symmetric(
                        strong.unwrap_or(current.upper_strong),
                        weak.unwrap_or(current.upper_weak),
                    ),
                };
                config.strategy = StrategyConfig::PercentThreshold(thresholds);
            }
            Some(Mode::Ema) => {
                let current = match config.strategy {
                    StrategyConfig::EmaCrossover(ema) => ema,
                    StrategyConfig::PercentThreshold(_) => EmaCrossoverConfig::default(),
                };
                config.strategy = StrategyConfig::EmaCrossover(EmaCrossoverConfig {
                    fast: self.fast.unwrap_or(current.fast),
                    slow: self.slow.unwrap_or(current.slow),
                });
            }
            None => {}
        }

        if self.hold {
            config.labels = SignalLabels::with_hold();
        }
        if self.sequential {
            config.parallel = false;
        }

        config.validate().context("invalid engine configuration")?;
        Ok(config)
    }

    /// Market configuration: defaults, then environment, then flags
    pub fn market_config(&self, engine: &EngineConfig) -> Result<MarketConfig> {
        let mut config = MarketConfig::default()
            .with_env()
            .context("invalid market configuration in environment")?;

        if let Some(range) = &self.range {
            config.history_range = range.clone();
        } else if matches!(engine.strategy, StrategyConfig::EmaCrossover(_))
            && config.history_range == MarketConfig::default().history_range
        {
            config.history_range = "3mo".to_string();
        }

        config.validate().context("invalid market configuration")?;
        Ok(config)
    }

    /// Tickers from `--tickers` and `--tickers-file`, in order of appearance
    pub async fn tickers(&self) -> Result<Vec<String>> {
        let mut tickers: Vec<String> = self
            .tickers
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        if let Some(path) = &self.tickers_file {
            let contents = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read tickers file {}", path.display()))?;
            tickers.extend(parse_ticker_lines(&contents));
        }

        Ok(tickers)
    }
}

/// One ticker per line; blank lines and `#` comments are ignored
pub fn parse_ticker_lines(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Fail early when nothing was asked for
pub fn require_tickers(tickers: Vec<String>) -> Result<Vec<String>> {
    if tickers.is_empty() {
        bail!("no tickers given; use --tickers, --tickers-file or --input");
    }
    Ok(tickers)
}
