//! Logging and tracing configuration
//!
//! Everything goes to stderr so rendered pages on stdout stay clean.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset, or does not parse
fn filter_or(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Initialize tracing for everyday CLI use
///
/// Defaults to INFO for this crate and WARN for dependencies.
pub fn init_cli() {
    let stderr = fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .compact();

    tracing_subscriber::registry()
        .with(filter_or("billed=info,warn"))
        .with(stderr)
        .init();
}

/// Initialize verbose tracing for scenario runs
///
/// Store calls and navigation are logged at DEBUG, with their source
/// location, so a failing scenario can be replayed in full detail.
pub fn init_verbose() {
    let stderr = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(filter_or("billed=debug,warn"))
        .with(stderr)
        .init();
}
