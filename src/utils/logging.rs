//! Logging initialization utilities
//!
//! Structured logging setup for binaries and tests embedding the engine.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// Respects `RUST_LOG`; defaults to `info` with engine debug logs. Safe to
/// call more than once; later calls are ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,werkstatt_metering=debug"));

    let _ = fmt().with_env_filter(filter).with_target(true).try_init();
}
