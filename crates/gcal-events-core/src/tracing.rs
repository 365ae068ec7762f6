//! Tracing setup for gcal-events
//!
//! Installs one compact, stderr-only subscriber for the command-line binary,
//! so log lines never mix with the event listings printed on stdout.
//! `RUST_LOG` overrides the preset level.
//!
//! ```ignore
//! use gcal_events_core::tracing::{init_tracing, TracingConfig};
//!
//! init_tracing(TracingConfig::cli())?;
//! ```

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Errors that can occur during tracing initialization
#[derive(Debug, Error)]
pub enum TracingError {
    /// Failed to set global subscriber
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Logging preset for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TracingConfig {
    /// Level used when RUST_LOG is not set
    pub default_level: Level,
    /// Include file/line of the log call
    pub include_location: bool,
    /// Include the module path
    pub include_target: bool,
}

impl TracingConfig {
    /// Quiet preset: warnings and errors only, results go to stdout.
    #[must_use]
    pub fn cli() -> Self {
        Self {
            default_level: Level::WARN,
            include_location: false,
            include_target: false,
        }
    }

    /// Preset for `--debug`.
    #[must_use]
    pub fn cli_debug() -> Self {
        Self {
            default_level: Level::DEBUG,
            include_location: true,
            include_target: true,
        }
    }

    /// Returns the filter directive used when `RUST_LOG` is not set.
    pub fn default_directive(&self) -> String {
        format!("gcal_events={}", self.default_level)
    }
}

/// Initialize tracing with the given preset.
///
/// Call once at startup.
///
/// # Errors
///
/// Returns an error if a global subscriber has already been set.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directive()));

    let layer = fmt::layer()
        .compact()
        .without_time()
        .with_writer(std::io::stderr)
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_target(config.include_target);

    let subscriber = tracing_subscriber::registry().with(env_filter).with(layer);
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}
