//! Report rendering for the terminal

use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use signal_engine::{BatchReport, BatchStatus, SignalLabels};

/// Ranked quotes as a table, followed by a summary line and any skipped symbols
pub fn render_table(report: &BatchReport, labels: &SignalLabels, top: usize) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Ticker", "Price", "Change %", "Signal"]);

    for (rank, quote) in report.quotes.iter().take(top).enumerate() {
        table.add_row(vec![
            (rank + 1).to_string(),
            quote.ticker.clone(),
            format!("{:.2}", quote.price),
            format!("{:+.2}", quote.change_percent),
            quote.label(labels).to_string(),
        ]);
    }

    let mut output = table.to_string();
    output.push('\n');
    output.push_str(&summary_line(report));

    if !report.failures.is_empty() {
        output.push_str("\nSkipped:");
        for failure in &report.failures {
            output.push_str(&format!("\n  {}: {}", failure.symbol, failure.error));
        }
    }

    output
}

/// One-line outcome, e.g. `9 of 10 symbols evaluated (partial)`
pub fn summary_line(report: &BatchReport) -> String {
    let status = match report.status() {
        BatchStatus::Complete => "complete",
        BatchStatus::Partial => "partial",
        BatchStatus::AllFailed => "all symbols failed",
        BatchStatus::Empty => "no symbols",
    };
    format!(
        "{} of {} symbols evaluated ({})",
        report.quotes.len(),
        report.total(),
        status
    )
}

pub fn render_json(report: &BatchReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
