//! Logging setup on top of `tracing-subscriber`.
//!
//! Precedence: `--verbose` (debug), then `--quiet` (errors only), then
//! `RUST_LOG`, then info for the quartet crates.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "quartet_core=debug,quartet_config=debug,quartet_cli=debug";
const QUIET_FILTER: &str = "quartet_core=error,quartet_config=error,quartet_cli=error";
const DEFAULT_FILTER: &str = "quartet_core=info,quartet_config=info,quartet_cli=info";

/// Build the filter for the given flags.
pub fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Install the global subscriber.
///
/// Only the first call in a process installs anything; later calls are
/// ignored so the runner can be invoked more than once (tests do).
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_filter(filter_for(verbose, quiet), no_color);
}

/// Install the global subscriber with an explicit filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
