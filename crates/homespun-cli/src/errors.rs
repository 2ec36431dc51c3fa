//! Error types for the CLI runtime.

use std::io;
use std::sync::Arc;

use homespun_discovery::DiscoveryError;
use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error("failed to initialise logging: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("plugin discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),
    #[error("unknown category '{0}'")]
    UnknownCategory(String),
    #[error("no plugin named '{name}' in {category}")]
    PluginNotFound { category: String, name: String },
    #[error("failed to serialise registry: {0}")]
    Serialise(serde_json::Error),
    #[error("failed to write output: {0}")]
    Write(io::Error),
}
