//! Logging and tracing setup

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "warn,signal_engine=info,signal_market=info,signal_scan=info";
const VERBOSE_FILTER: &str = "info,signal_engine=debug,signal_market=debug,signal_scan=debug";

/// Initialize tracing to stderr, leaving stdout for report output
///
/// `RUST_LOG` takes precedence over `verbose`.
pub fn init_tracing(verbose: bool, json: bool) {
    let default = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
