use std::io::{self, IsTerminal};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "warn";

fn make_filter(level: Option<&str>) -> EnvFilter {
    match level {
        Some(directive) => EnvFilter::try_new(directive).unwrap_or_else(|e| {
            eprintln!("invalid log level '{directive}': {e}; using '{DEFAULT_FILTER}'");
            EnvFilter::new(DEFAULT_FILTER)
        }),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    }
}

/// Initializes logging. Call once at startup.
///
/// - Writes to stderr so stdout stays machine-readable.
/// - Colored when stderr is a terminal, plain when redirected.
/// - Level: `--log-level`, else RUST_LOG, else WARN.
pub fn init_logging(level: Option<&str>) {
    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false);

    // A second init (e.g. from tests) is harmless.
    let _ = tracing_subscriber::registry()
        .with(make_filter(level))
        .with(stderr_layer)
        .try_init();
}
