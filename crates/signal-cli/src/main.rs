//! Signal scanner CLI
//!
//! Fetches daily bars for a list of tickers, evaluates the configured signal
//! strategy and prints the ranked result.
//!
//! # Usage
//!
//! ```bash
//! # Live data from Yahoo Finance, percent-change bands
//! signal-scan --tickers AAPL,MSFT,NVDA,BRK.B
//!
//! # Offline snapshot, EMA 9/21 crossover, JSON output
//! signal-scan --input snapshot.json --mode ema --format json
//!
//! # Commentary prompt for an LLM
//! signal-scan --tickers-file sp500.txt --format prompt --top 5
//! ```

mod cli;
mod logging;
mod output;
mod prompt;

use anyhow::{Context, bail};
use clap::Parser;
use cli::{Args, OutputFormat};
use signal_engine::{BatchStatus, EngineConfig, SignalEngine, evaluate_batch};
use signal_market::{CachedSource, MarketDataSource, StaticSource, YahooSource, fetch_snapshot};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logging::init_tracing(args.verbose, args.log_json);

    let base = match &args.config {
        Some(path) => {
            let json = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read config {}", path.display()))?;
            EngineConfig::from_json_str(&json)?
        }
        None => EngineConfig::default(),
    };
    let engine = SignalEngine::new(args.engine_config(base)?)?;
    let market_config = args.market_config(engine.config())?;

    let mut tickers = args.tickers().await?;

    let source: Box<dyn MarketDataSource> = match &args.input {
        Some(path) => {
            let snapshot = StaticSource::from_path(path)
                .await
                .with_context(|| format!("failed to load snapshot {}", path.display()))?;
            if tickers.is_empty() {
                tickers = snapshot.symbols();
            }
            Box::new(snapshot)
        }
        None => Box::new(CachedSource::new(
            YahooSource::new(&market_config)?,
            &market_config,
        )),
    };
    let tickers = cli::require_tickers(tickers)?;

    info!(
        source = source.name(),
        symbols = tickers.len(),
        range = %market_config.history_range,
        "Starting scan"
    );

    let snapshot = fetch_snapshot(source.as_ref(), &tickers, market_config.max_concurrency).await;
    let mut report = evaluate_batch(&engine, &snapshot.series);
    report.merge_failures(snapshot.failures);

    let rendered = match args.format {
        OutputFormat::Table => output::render_table(&report, engine.labels(), args.top),
        OutputFormat::Json => output::render_json(&report)?,
        OutputFormat::Prompt => prompt::render_prompt(&report, engine.labels(), args.top)?,
    };
    println!("{rendered}");

    if report.status() == BatchStatus::AllFailed {
        bail!("all {} symbols failed", report.total());
    }

    Ok(())
}
