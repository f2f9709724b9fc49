//! Logging setup utilities for the Serambi binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// The filter covers the `serambi_*` library crates and the binary itself.
/// `RUST_LOG` overrides the default when set.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "serambi-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info")
///
/// # Examples
///
/// ```no_run
/// use serambi_shared::logger::setup_logger;
///
/// setup_logger("serambi-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    format!(
        "serambi_shared={level},serambi_server={level},serambi_client={level},{}={level},tower_http={level}",
        binary_name.replace('-', "_"),
        level = default_log_level,
    )
}
