//! Tracing subscriber setup shared by binaries and test fixtures.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `default_level` is applied to this
/// crate and `info` to everything else. Safe to call more than once (later
/// calls are ignored), which keeps test fixtures simple.
pub fn setup_logger(name: &str, default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("info,careline={default_level}")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();

    tracing::debug!("logger initialized for '{name}'");
}
