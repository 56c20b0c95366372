//! Logging setup utilities for the matchroom server.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose spans and events are enabled by the default filter.
const LOGGED_CRATES: [&str; 2] = ["matchroom_server", "matchroom_shared"];

/// Build the default `EnvFilter` directive string.
///
/// Produces `crate=level` pairs for each workspace crate and the binary,
/// listing each target once.
fn default_directives(binary_name: &str, default_log_level: &str) -> String {
    let mut targets: Vec<String> = Vec::new();
    for target in LOGGED_CRATES.iter().copied().chain(std::iter::once(binary_name)) {
        let target = target.replace('-', "_");
        if !targets.contains(&target) {
            targets.push(target);
        }
    }
    targets
        .iter()
        .map(|target| format!("{}={}", target, default_log_level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "matchroom-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use matchroom_shared::logger::setup_logger;
///
/// setup_logger("matchroom-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directives(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
