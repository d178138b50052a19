//! Logging setup.
//!
//! Diagnostics go to stderr so stdout stays clean for JSON output.
//! `RUST_LOG` wins over the verbosity flags when set.

use tracing_subscriber::EnvFilter;

/// Default filter for a verbosity level.
#[must_use]
pub fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "devtrack=debug,devtrack_lib=debug,info",
        _ => "trace",
    }
}

/// Install the global subscriber.
///
/// `json` switches to one JSON object per event.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(
    verbose: u8,
    quiet: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose > 1);

    if json {
        builder.json().try_init()
    } else {
        builder.without_time().try_init()
    }
}

/// Subscriber for unit tests; safe to call repeatedly.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
