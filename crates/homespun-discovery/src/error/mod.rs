//! Domain errors raised during discovery.
//!
//! All errors use `thiserror`-derived enums with structured context so callers
//! can inspect the failure programmatically. I/O errors are wrapped in `Arc`
//! to satisfy the `result_large_err` Clippy lint.
//!
//! A missing category directory is not an error; the scanner treats it as an
//! empty category. Everything reported here aborts discovery.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::category::Category;

/// Errors that abort a discovery run.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// An existing category directory could not be listed.
    #[error("failed to scan category directory {path}: {source}")]
    Scan {
        /// Directory that was being listed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// A plugin descriptor could not be read from disk.
    #[error("failed to read plugin file {path}: {source}")]
    Read {
        /// Descriptor path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The descriptor's extension maps to no known format.
    #[error("plugin file {path} has an unsupported format")]
    UnsupportedFormat {
        /// Descriptor path.
        path: PathBuf,
    },

    /// The descriptor is not a valid module manifest.
    #[error("failed to parse plugin file {path}: {message}")]
    Parse {
        /// Descriptor path.
        path: PathBuf,
        /// Parser diagnostic.
        message: String,
    },

    /// The descriptor names a module missing from the catalog.
    #[error("plugin file {path} names unknown module '{module}'")]
    UnknownModule {
        /// Descriptor path.
        path: PathBuf,
        /// Module identifier requested by the descriptor.
        module: String,
    },

    /// The module constructor rejected the descriptor.
    #[error("module for plugin file {path} failed to load: {message}")]
    Module {
        /// Descriptor path.
        path: PathBuf,
        /// Constructor diagnostic.
        message: String,
    },

    /// Two descriptors in one category normalised to the same name.
    #[error(
        "plugin name '{name}' in {category} is claimed by both {existing} and {incoming}"
    )]
    NameCollision {
        /// Category holding both descriptors.
        category: Category,
        /// Normalised plugin name.
        name: String,
        /// Descriptor registered first.
        existing: PathBuf,
        /// Descriptor that attempted to replace it.
        incoming: PathBuf,
    },

    /// A plugin's `once` hook failed.
    #[error("plugin '{category}.{name}' failed to initialise: {source}")]
    Init {
        /// Category of the failing plugin.
        category: Category,
        /// Name of the failing plugin.
        name: String,
        /// Error returned by the hook.
        #[source]
        source: InitError,
    },
}

impl DiscoveryError {
    /// Returns `true` for failures raised while loading descriptors.
    #[must_use]
    pub const fn is_load_error(&self) -> bool {
        matches!(
            self,
            Self::Read { .. }
                | Self::UnsupportedFormat { .. }
                | Self::Parse { .. }
                | Self::UnknownModule { .. }
                | Self::Module { .. }
        )
    }
}

/// Errors returned from a plugin's `once` hook.
#[derive(Debug, Error)]
pub enum InitError {
    /// The hook needed a plugin the registry does not hold.
    #[error("required plugin '{category}.{name}' is not registered")]
    MissingPlugin {
        /// Category that was searched.
        category: Category,
        /// Plugin name that was looked up.
        name: String,
    },

    /// The hook failed for a plugin-specific reason.
    #[error("{message}")]
    Failed {
        /// Human-readable failure description.
        message: String,
    },
}

impl InitError {
    /// Creates a plugin-specific failure.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}
