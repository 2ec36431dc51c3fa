//! Module manifests: the contents of a plugin descriptor file.
//!
//! A descriptor names the catalog module to build (defaulting to
//! [`DEFAULT_MODULE`]), seeds the plugin's exports, and may declare a `once`
//! section. Unknown keys are rejected so typos surface as load errors rather
//! than silently ignored settings.
//!
//! ```toml
//! module = "record"
//! description = "UPnP event subscriber"
//!
//! [exports]
//! timeout_secs = 300
//!
//! [once]
//! requires = ["listeners.http", "utilities.roundtrip"]
//! set = { ready = true }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::registry::PluginRef;

/// Module built when a descriptor does not name one.
pub const DEFAULT_MODULE: &str = "record";

/// Serialisation format of a descriptor, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    /// TOML descriptor (`.toml`).
    Toml,
    /// JSON descriptor (`.json`).
    Json,
}

impl ManifestFormat {
    /// Detects the format from the path's extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Parses descriptor text in this format.
    ///
    /// # Errors
    ///
    /// Returns the parser's diagnostic when `text` is not a valid manifest.
    pub fn parse(self, text: &str) -> Result<ModuleManifest, String> {
        match self {
            Self::Toml => toml::from_str(text).map_err(|error| error.to_string()),
            Self::Json => serde_json::from_str(text).map_err(|error| error.to_string()),
        }
    }
}

/// Parsed descriptor contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleManifest {
    #[serde(default = "default_module")]
    module: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    exports: Map<String, Value>,
    #[serde(default)]
    once: Option<OnceSpec>,
}

fn default_module() -> String {
    String::from(DEFAULT_MODULE)
}

impl Default for ModuleManifest {
    fn default() -> Self {
        Self {
            module: default_module(),
            description: None,
            exports: Map::new(),
            once: None,
        }
    }
}

impl ModuleManifest {
    /// Creates a manifest for `module` with no exports or hook.
    #[must_use]
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            ..Self::default()
        }
    }

    /// Sets the initial exports.
    #[must_use]
    pub fn with_exports(mut self, exports: Map<String, Value>) -> Self {
        self.exports = exports;
        self
    }

    /// Declares a `once` section.
    #[must_use]
    pub fn with_once(mut self, once: OnceSpec) -> Self {
        self.once = Some(once);
        self
    }

    /// Returns the catalog module identifier.
    #[must_use]
    pub const fn module(&self) -> &str {
        self.module.as_str()
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the initial exports.
    #[must_use]
    pub const fn exports(&self) -> &Map<String, Value> {
        &self.exports
    }

    /// Returns the declared `once` section.
    #[must_use]
    pub const fn once(&self) -> Option<&OnceSpec> {
        self.once.as_ref()
    }
}

/// Declarative `once` hook.
///
/// At initialisation every plugin in `requires` must be registered, then each
/// entry of `set` is attached to `target` (the declaring plugin when absent).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OnceSpec {
    #[serde(default)]
    requires: Vec<PluginRef>,
    #[serde(default)]
    target: Option<PluginRef>,
    #[serde(default)]
    set: Map<String, Value>,
}

impl OnceSpec {
    /// Creates an empty hook declaration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the plugins that must be registered.
    #[must_use]
    pub fn with_requires(mut self, requires: Vec<PluginRef>) -> Self {
        self.requires = requires;
        self
    }

    /// Redirects `set` to another plugin.
    #[must_use]
    pub fn with_target(mut self, target: PluginRef) -> Self {
        self.target = Some(target);
        self
    }

    /// Sets the values attached during initialisation.
    #[must_use]
    pub fn with_set(mut self, set: Map<String, Value>) -> Self {
        self.set = set;
        self
    }

    /// Returns the required plugins.
    #[must_use]
    pub fn requires(&self) -> &[PluginRef] {
        &self.requires
    }

    /// Returns the explicit target, if any.
    #[must_use]
    pub const fn target(&self) -> Option<&PluginRef> {
        self.target.as_ref()
    }

    /// Returns the values attached during initialisation.
    #[must_use]
    pub const fn set(&self) -> &Map<String, Value> {
        &self.set
    }
}

#[cfg(test)]
mod tests;
