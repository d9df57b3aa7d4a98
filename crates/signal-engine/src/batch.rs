//! Batch evaluation over many symbols with per-symbol failure isolation

use crate::engine::{RankedQuote, SignalEngine};
use crate::error::SignalError;
use crate::series::PriceSeries;
use crate::signal::Signal;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use tracing::{info, warn};

/// Category of a per-symbol failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    DataInsufficient,
    DivisionByZero,
    UnorderedSeries,
    Configuration,
    /// The market-data source could not deliver the series
    Fetch,
}

impl From<&SignalError> for FailureKind {
    fn from(error: &SignalError) -> Self {
        match error {
            SignalError::DataInsufficient { .. } => FailureKind::DataInsufficient,
            SignalError::DivisionByZero { .. } => FailureKind::DivisionByZero,
            SignalError::UnorderedSeries { .. } => FailureKind::UnorderedSeries,
            SignalError::Configuration(_) => FailureKind::Configuration,
        }
    }
}

/// A symbol that could not be evaluated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolFailure {
    pub symbol: String,
    pub kind: FailureKind,
    /// Human-readable error message
    pub error: String,
}

impl SymbolFailure {
    pub fn new(symbol: impl Into<String>, kind: FailureKind, error: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            kind,
            error: error.into(),
        }
    }

    pub fn from_signal_error(symbol: impl Into<String>, error: &SignalError) -> Self {
        Self::new(symbol, FailureKind::from(error), error.to_string())
    }
}

/// Overall outcome of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// Every symbol produced a quote
    Complete,
    /// Some symbols were skipped
    Partial,
    /// Symbols were supplied but none could be evaluated
    AllFailed,
    /// No symbols were supplied
    Empty,
}

/// Successes and failures of one evaluation pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Ranked by change percent, highest first
    pub quotes: Vec<RankedQuote>,
    /// Sorted by symbol
    pub failures: Vec<SymbolFailure>,
}

impl BatchReport {
    pub fn status(&self) -> BatchStatus {
        match (self.quotes.is_empty(), self.failures.is_empty()) {
            (true, true) => BatchStatus::Empty,
            (true, false) => BatchStatus::AllFailed,
            (false, true) => BatchStatus::Complete,
            (false, false) => BatchStatus::Partial,
        }
    }

    /// Number of symbols attempted
    pub fn total(&self) -> usize {
        self.quotes.len() + self.failures.len()
    }

    /// Highest `n` movers
    pub fn top_gainers(&self, n: usize) -> &[RankedQuote] {
        &self.quotes[..n.min(self.quotes.len())]
    }

    /// Lowest `n` movers, biggest loser first
    pub fn top_losers(&self, n: usize) -> Vec<&RankedQuote> {
        self.quotes.iter().rev().take(n).collect()
    }

    pub fn with_signal(&self, signal: Signal) -> Vec<&RankedQuote> {
        self.quotes.iter().filter(|q| q.signal == signal).collect()
    }

    /// Number of quotes per signal; signals with no quotes are omitted
    pub fn signal_counts(&self) -> BTreeMap<Signal, usize> {
        let mut counts = BTreeMap::new();
        for quote in &self.quotes {
            *counts.entry(quote.signal).or_insert(0) += 1;
        }
        counts
    }

    pub fn quote(&self, ticker: &str) -> Option<&RankedQuote> {
        self.quotes.iter().find(|q| q.ticker == ticker)
    }

    /// Fold in failures from an earlier stage, e.g. symbols that could not be fetched
    pub fn merge_failures(&mut self, failures: impl IntoIterator<Item = SymbolFailure>) {
        self.failures.extend(failures);
        self.failures.sort_by(|a, b| a.symbol.cmp(&b.symbol));
    }
}

/// Evaluate every series independently
///
/// Quotes and failures are both reported under the map key, whatever symbol
/// the series itself carries. A failing symbol is recorded in [`BatchReport::failures`] and never aborts
/// the rest of the batch. Output order does not depend on map iteration order
/// or on thread scheduling.
pub fn evaluate_batch(engine: &SignalEngine, batch: &HashMap<String, PriceSeries>) -> BatchReport {
    let evaluate = |(symbol, series): (&String, &PriceSeries)| {
        (symbol.clone(), engine.evaluate(series))
    };

    let results: Vec<(String, Result<RankedQuote, SignalError>)> = if engine.config().parallel {
        batch.par_iter().map(evaluate).collect()
    } else {
        batch.iter().map(evaluate).collect()
    };

    let mut report = BatchReport::default();
    for (symbol, result) in results {
        match result {
            Ok(mut quote) => {
                quote.ticker = symbol;
                report.quotes.push(quote);
            }
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "Skipping symbol");
                report.failures.push(SymbolFailure::from_signal_error(symbol, &e));
            }
        }
    }

    report.quotes.sort_by(rank_order);
    report.failures.sort_by(|a, b| a.symbol.cmp(&b.symbol));

    info!(
        evaluated = report.quotes.len(),
        skipped = report.failures.len(),
        status = ?report.status(),
        "Batch evaluation finished"
    );

    report
}

fn rank_order(a: &RankedQuote, b: &RankedQuote) -> Ordering {
    b.change_percent
        .total_cmp(&a.change_percent)
        .then_with(|| a.ticker.cmp(&b.ticker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use chrono::NaiveDate;

    fn series(symbol: &str, closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        PriceSeries::from_closes(symbol, start, closes)
    }

    fn batch(entries: &[(&str, &[f64])]) -> HashMap<String, PriceSeries> {
        entries
            .iter()
            .map(|(symbol, closes)| (symbol.to_string(), series(symbol, closes)))
            .collect()
    }

    fn engine(parallel: bool) -> SignalEngine {
        SignalEngine::new(EngineConfig::builder().parallel(parallel).build().unwrap()).unwrap()
    }

    #[test]
    fn test_one_short_series_among_valid_ones() {
        let mut input = batch(&[
            ("A", &[100.0, 101.0]),
            ("B", &[100.0, 102.0]),
            ("C", &[100.0, 103.0]),
            ("D", &[100.0, 99.0]),
            ("E", &[100.0, 98.0]),
            ("F", &[100.0, 100.0]),
            ("G", &[50.0, 55.0]),
            ("H", &[20.0, 19.0]),
            ("I", &[10.0, 10.2]),
        ]);
        input.insert("SHORT".to_string(), series("SHORT", &[100.0]));

        for parallel in [false, true] {
            let report = evaluate_batch(&engine(parallel), &input);
            assert_eq!(report.quotes.len(), 9);
            assert_eq!(report.failures.len(), 1);
            assert_eq!(report.failures[0].symbol, "SHORT");
            assert_eq!(report.status(), BatchStatus::Partial);
            assert!(report.quote("SHORT").is_none());
        }
    }

    #[test]
    fn test_zero_previous_close_is_excluded() {
        let input = batch(&[("OK", &[10.0, 11.0]), ("ZERO", &[0.0, 5.0])]);
        let report = evaluate_batch(&engine(false), &input);

        assert_eq!(report.quotes.len(), 1);
        assert_eq!(report.quotes[0].ticker, "OK");
        assert_eq!(report.failures[0].kind, FailureKind::DivisionByZero);
        assert!(report.failures[0].error.contains("Division by zero"));
    }

    #[test]
    fn test_bad_close_mid_series_is_excluded() {
        let input = batch(&[
            ("OK", &[10.0, 10.5, 11.0]),
            ("NEG", &[10.0, -1.0, 10.0, 10.1]),
            ("NAN", &[f64::NAN, 10.0, 10.1]),
        ]);

        for parallel in [false, true] {
            let report = evaluate_batch(&engine(parallel), &input);
            let symbols: Vec<&str> = report.failures.iter().map(|f| f.symbol.as_str()).collect();
            assert_eq!(symbols, vec!["NAN", "NEG"]);
            assert!(report.failures.iter().all(|f| f.kind == FailureKind::DivisionByZero));
            assert_eq!(report.quotes.len(), 1);
        }
    }

    #[test]
    fn test_quote_ticker_follows_map_key() {
        let mut input = HashMap::new();
        input.insert("BRK-B".to_string(), series("brk.b", &[400.0, 404.0]));
        input.insert("NEWCO".to_string(), series("newco", &[12.0]));

        let report = evaluate_batch(&engine(false), &input);
        assert_eq!(report.quotes[0].ticker, "BRK-B");
        assert!(report.quote("BRK-B").is_some());
        assert_eq!(report.failures[0].symbol, "NEWCO");
        assert_eq!(report.failures[0].kind, FailureKind::DataInsufficient);
    }

    #[test]
    fn test_ranking_and_movers() {
        let input = batch(&[
            ("FLAT", &[100.0, 100.0]),
            ("UP", &[100.0, 103.0]),
            ("DOWN", &[100.0, 96.0]),
            ("BIT", &[100.0, 100.6]),
            ("TIE", &[100.0, 100.0]),
        ]);
        let report = evaluate_batch(&engine(true), &input);

        let order: Vec<&str> = report.quotes.iter().map(|q| q.ticker.as_str()).collect();
        assert_eq!(order, vec!["UP", "BIT", "FLAT", "TIE", "DOWN"]);

        assert_eq!(report.top_gainers(2)[0].ticker, "UP");
        assert_eq!(report.top_gainers(10).len(), 5);
        assert_eq!(report.top_losers(1)[0].ticker, "DOWN");

        let counts = report.signal_counts();
        assert_eq!(counts.get(&Signal::StrongBuy), Some(&1));
        assert_eq!(counts.get(&Signal::Buy), Some(&1));
        assert_eq!(counts.get(&Signal::Neutral), Some(&2));
        assert_eq!(counts.get(&Signal::StrongSell), Some(&1));
        assert_eq!(counts.get(&Signal::Sell), None);
        assert_eq!(report.with_signal(Signal::Neutral).len(), 2);
        assert_eq!(report.status(), BatchStatus::Complete);
    }

    #[test]
    fn test_empty_and_all_failed_are_distinct() {
        let empty = evaluate_batch(&engine(false), &HashMap::new());
        assert_eq!(empty.status(), BatchStatus::Empty);
        assert_eq!(empty.total(), 0);

        let input = batch(&[("A", &[1.0]), ("B", &[0.0, 1.0])]);
        let failed = evaluate_batch(&engine(false), &input);
        assert_eq!(failed.status(), BatchStatus::AllFailed);
        assert_eq!(failed.total(), 2);
        let symbols: Vec<&str> = failed.failures.iter().map(|f| f.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["A", "B"]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let input = batch(&[
            ("A", &[10.0, 10.5]),
            ("B", &[10.0, 9.1]),
            ("C", &[10.0]),
            ("D", &[7.0, 7.0]),
        ]);
        assert_eq!(
            evaluate_batch(&engine(true), &input),
            evaluate_batch(&engine(false), &input)
        );
    }

    #[test]
    fn test_merge_failures() {
        let input = batch(&[("B", &[1.0])]);
        let mut report = evaluate_batch(&engine(false), &input);
        report.merge_failures(vec![SymbolFailure::new("A", FailureKind::Fetch, "fetch failed")]);

        let symbols: Vec<&str> = report.failures.iter().map(|f| f.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["A", "B"]);
        assert_eq!(report.status(), BatchStatus::AllFailed);
    }

    #[test]
    fn test_report_serializes() {
        let input = batch(&[("A", &[100.0, 102.6])]);
        let report = evaluate_batch(&engine(false), &input);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["quotes"][0]["ticker"], "A");
        assert_eq!(json["quotes"][0]["signal"], "STRONG_BUY");
        assert_eq!(json["quotes"][0]["change_percent"], 2.6);

        let failure = SymbolFailure::from_signal_error(
            "Z",
            &SignalError::DataInsufficient {
                symbol: "Z".to_string(),
                required: 2,
                available: 1,
            },
        );
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["kind"], "data_insufficient");
    }
}
