//! Structured logging through `tracing-subscriber`.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use tracker_config::{LogConfig, LogFormat};

/// Install the global subscriber described by `config`.
///
/// Explicit `filter` directives win, then `RUST_LOG`, then the configured
/// level. Later calls are ignored once a subscriber is installed.
pub fn init_logging(config: &LogConfig) {
    let level = config.level.as_str();
    let filter = match &config.filter {
        Some(directives) => EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(level)),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
    };

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.format {
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init(),
        LogFormat::Compact => registry.with(fmt::layer().compact()).try_init(),
    };

    // Already initialised by the host application or an earlier test.
    let _ = result;
}
