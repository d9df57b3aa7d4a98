//! Commentary prompt handed to an LLM alongside the scan results

use minijinja::{Environment, context};
use serde::Serialize;
use signal_engine::{BatchReport, RankedQuote, Signal, SignalLabels};

const COMMENTARY_TEMPLATE: &str = "\
You are a concise equity market commentator.
Today's scan covered {{ total }} symbols: {{ evaluated }} evaluated, {{ skipped }} skipped.

Top gainers:
{% for q in gainers %}- {{ q.ticker }} at {{ q.price }} ({{ q.change }}%), signal {{ q.signal }}
{% else %}- none
{% endfor %}
Top losers:
{% for q in losers %}- {{ q.ticker }} at {{ q.price }} ({{ q.change }}%), signal {{ q.signal }}
{% else %}- none
{% endfor %}
Signal breakdown: {% for s in breakdown %}{{ s.label }} {{ s.count }}{% if not loop.last %}, {% endif %}{% endfor %}

Write three short paragraphs summarising the session, the strongest movers and \
the overall signal mix. Do not give personalised financial advice.";

#[derive(Serialize)]
struct PromptQuote<'a> {
    ticker: &'a str,
    price: String,
    change: String,
    signal: &'a str,
}

#[derive(Serialize)]
struct SignalCount<'a> {
    label: &'a str,
    count: usize,
}

fn prompt_quote<'a>(q: &'a RankedQuote, labels: &'a SignalLabels) -> PromptQuote<'a> {
    PromptQuote {
        ticker: &q.ticker,
        price: format!("{:.2}", q.price),
        change: format!("{:+.2}", q.change_percent),
        signal: labels.label(q.signal),
    }
}

/// Render the commentary prompt for the `top` biggest gainers and losers
pub fn render_prompt(
    report: &BatchReport,
    labels: &SignalLabels,
    top: usize,
) -> Result<String, minijinja::Error> {
    let gainers: Vec<PromptQuote> = report
        .top_gainers(top)
        .iter()
        .filter(|q| q.change_percent > 0.0)
        .map(|q| prompt_quote(q, labels))
        .collect();
    let losers: Vec<PromptQuote> = report
        .top_losers(top)
        .into_iter()
        .filter(|q| q.change_percent < 0.0)
        .map(|q| prompt_quote(q, labels))
        .collect();

    let counts = report.signal_counts();
    let breakdown: Vec<SignalCount> = Signal::ALL
        .iter()
        .map(|&s| SignalCount {
            label: labels.label(s),
            count: counts.get(&s).copied().unwrap_or(0),
        })
        .collect();

    let mut env = Environment::new();
    env.add_template("commentary", COMMENTARY_TEMPLATE)?;
    env.get_template("commentary")?.render(context! {
        total => report.total(),
        evaluated => report.quotes.len(),
        skipped => report.failures.len(),
        gainers => gainers,
        losers => losers,
        breakdown => breakdown,
    })
}
