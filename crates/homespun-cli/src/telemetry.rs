//! Structured logging for the CLI.
//!
//! Logs always go to stderr so stdout carries only the JSON registry. The
//! JSON format is meant for log collectors and keeps timestamps and targets;
//! the compact format is for people watching a terminal and drops both.

use std::io::{self, IsTerminal};

use homespun_config::{Config, LogFormat};
use once_cell::sync::OnceCell;
use tracing::{Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::{self, time::UtcTime};

static INSTALLED_FORMAT: OnceCell<LogFormat> = OnceCell::new();

/// Errors encountered while configuring logging.
#[derive(Debug, thiserror::Error)]
pub(crate) enum TelemetryError {
    /// The configured filter expression is invalid.
    #[error("invalid log filter: {0}")]
    Filter(String),
    /// Another global subscriber is already installed.
    #[error("failed to install log subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Installs the global subscriber on first use and returns the format in
/// effect.
///
/// A process runs one command, so the first configuration wins; later calls
/// report the format that was installed rather than the one they asked for.
pub(crate) fn initialise(config: &Config) -> Result<LogFormat, TelemetryError> {
    INSTALLED_FORMAT
        .get_or_try_init(|| install_subscriber(config))
        .copied()
}

fn install_subscriber(config: &Config) -> Result<LogFormat, TelemetryError> {
    let filter = EnvFilter::try_new(config.log_filter())
        .map_err(|error| TelemetryError::Filter(error.to_string()))?;
    let format = config.log_format();
    tracing::subscriber::set_global_default(subscriber_for(format, filter))
        .map_err(TelemetryError::Subscriber)?;
    Ok(format)
}

fn subscriber_for(format: LogFormat, filter: EnvFilter) -> Box<dyn Subscriber + Send + Sync> {
    let base = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    match format {
        LogFormat::Json => Box::new(
            base.json()
                .flatten_event(true)
                .with_current_span(false)
                .with_timer(UtcTime::rfc_3339())
                .finish(),
        ),
        LogFormat::Compact => Box::new(
            base.compact()
                .with_target(false)
                .without_time()
                .with_ansi(io::stderr().is_terminal())
                .finish(),
        ),
    }
}
