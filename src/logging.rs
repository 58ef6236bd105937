//! Tracing subscriber setup for the binary.

use tracing_subscriber::EnvFilter;

/// Filter directive used when `RUST_LOG` is unset.
pub fn default_directive(level: &str) -> String {
    format!("solar_savings={level}")
}

/// Installs a stderr `fmt` subscriber filtered by `RUST_LOG`, falling back
/// to `level` for this crate. Logs go to stderr so stdout stays clean for
/// reports and JSON.
///
/// Calling it twice is harmless; the second call leaves the first
/// subscriber in place.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    if installed.is_ok() {
        tracing::debug!(level, "logging initialized");
    }
}
