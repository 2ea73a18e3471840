//! Logging setup for the chat relay binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// Applies `default_log_level` to both the library crate and the binary.
/// The `RUST_LOG` environment variable overrides the filter entirely.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "charla-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info")
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "{}={},{}={}",
                    env!("CARGO_PKG_NAME").replace("-", "_"),
                    default_log_level,
                    binary_name.replace("-", "_"),
                    default_log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
