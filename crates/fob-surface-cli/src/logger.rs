//! Logging setup for the `fob-surface` command.
//!
//! Logs always go to stderr: stdout carries the report JSON and must stay
//! machine-readable.
//!
//! The level is picked in this order:
//! 1. `--verbose`: DEBUG for the surface crates
//! 2. `--quiet`: errors only
//! 3. `RUST_LOG`
//! 4. INFO for the surface crates

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "fob_surface=debug,fob_surface_cli=debug";
const QUIET_FILTER: &str = "fob_surface=error,fob_surface_cli=error";
const DEFAULT_FILTER: &str = "fob_surface=info,fob_surface_cli=info";

/// Build the filter for the given flags.
pub fn build_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Initialize the global tracing subscriber. Call once, before any logging.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && should_use_colors())
        .compact();

    tracing_subscriber::registry()
        .with(build_filter(verbose, quiet))
        .with(fmt_layer)
        .init();
}

/// Whether stderr should get ANSI colors (`NO_COLOR` / `FORCE_COLOR` aware).
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::Term::stderr().features().colors_supported()
}
