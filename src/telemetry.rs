//! # Telemetry
//!
//! Global `tracing` subscriber setup.
//!
//! `RUST_LOG` takes precedence over the configured level when set.

use crate::config::{LogFormat, LoggingConfig};
use tracing_subscriber::{EnvFilter, fmt};

/// Builds the level filter: `RUST_LOG` if set and valid, else `config.level`.
#[must_use]
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Installs the global subscriber.
///
/// Installing twice is harmless: the second attempt is reported and
/// ignored.
pub fn init(config: &LoggingConfig) {
    let filter = env_filter(config);
    let result = match config.format {
        LogFormat::Json => fmt()
            .with_env_filter(filter)
            .json()
            .with_current_span(false)
            .try_init(),
        LogFormat::Text => fmt().with_env_filter(filter).try_init(),
    };

    match result {
        Ok(()) => tracing::info!(
            level = %config.level,
            format = %config.format,
            version = %config.version,
            "logging initialised"
        ),
        Err(e) => tracing::warn!(error = %e, "tracing init failed"),
    }
}
