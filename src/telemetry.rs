//! Tracing subscriber setup for the service binary.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global `fmt` subscriber.
///
/// `RUST_LOG` takes precedence over `default_filter` when set.
///
/// # Errors
///
/// Returns an error when `default_filter` is not a valid directive or a
/// global subscriber is already installed.
pub fn init_tracing(default_filter: &str) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .map_err(|err| TelemetryError(err.to_string()))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()
        .map_err(|err| TelemetryError(err.to_string()))
}

/// Failure to install the tracing subscriber.
#[derive(Debug, thiserror::Error)]
#[error("failed to initialise tracing: {0}")]
pub struct TelemetryError(String);
