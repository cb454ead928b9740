//! Diagnostic tracing for the CLI.
//!
//! Step envelopes and command output go to stdout; tracing goes to stderr so
//! the two never mix, which keeps `serve` usable as a JSON-lines pipe.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`, defaulting to `warn`.
///
/// # Example
/// ```bash
/// RUST_LOG=bs_core=debug batch-step run purge-drafts
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
