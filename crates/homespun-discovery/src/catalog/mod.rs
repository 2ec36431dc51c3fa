//! Statically declared table of plugin module constructors.
//!
//! Descriptor files never carry executable code. Each names a module
//! identifier, and the [`ModuleCatalog`] maps that identifier to a
//! [`ModuleFactory`] compiled into the host. [`ModuleCatalog::builtin`]
//! provides the modules shipped with this crate; hosts add their own with
//! [`ModuleCatalog::register`].

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::category::Category;
use crate::manifest::ModuleManifest;
use crate::plugin::Plugin;
use crate::registry::PluginRef;

pub mod record;
pub mod sensor_types;

/// Constructor for a plugin module.
pub type ModuleFactory = fn(&ModuleSource<'_>) -> Result<Arc<dyn Plugin>, ModuleError>;

/// Failure reported by a module constructor or by catalog registration.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ModuleError {
    message: String,
}

impl ModuleError {
    /// Creates an error with the given description.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Everything a module constructor receives about the file being loaded.
#[derive(Debug, Clone, Copy)]
pub struct ModuleSource<'a> {
    category: Category,
    name: &'a str,
    path: &'a Path,
    manifest: &'a ModuleManifest,
}

impl<'a> ModuleSource<'a> {
    /// Bundles the origin of a descriptor with its parsed manifest.
    #[must_use]
    pub const fn new(
        category: Category,
        name: &'a str,
        path: &'a Path,
        manifest: &'a ModuleManifest,
    ) -> Self {
        Self {
            category,
            name,
            path,
            manifest,
        }
    }

    /// Returns the category the descriptor was found in.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Returns the plugin name derived from the file name.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }

    /// Returns the descriptor path.
    #[must_use]
    pub const fn path(&self) -> &'a Path {
        self.path
    }

    /// Returns the parsed manifest.
    #[must_use]
    pub const fn manifest(&self) -> &'a ModuleManifest {
        self.manifest
    }

    /// Returns the registry address the plugin will occupy.
    #[must_use]
    pub fn reference(&self) -> PluginRef {
        PluginRef::new(self.category, self.name)
    }
}

/// Table of module identifiers to constructors.
///
/// # Example
///
/// ```
/// use homespun_discovery::ModuleCatalog;
///
/// let catalog = ModuleCatalog::builtin();
/// assert!(catalog.get("record").is_some());
/// assert!(catalog.get("sensor-types").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModuleCatalog {
    factories: BTreeMap<String, ModuleFactory>,
}

impl ModuleCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog holding the modules shipped with this crate.
    #[must_use]
    pub fn builtin() -> Self {
        let mut factories: BTreeMap<String, ModuleFactory> = BTreeMap::new();
        factories.insert(String::from(record::MODULE_ID), record::build);
        factories.insert(String::from(sensor_types::MODULE_ID), sensor_types::build);
        Self { factories }
    }

    /// Adds a module constructor.
    ///
    /// # Errors
    ///
    /// Returns a [`ModuleError`] when the identifier is empty or already
    /// registered.
    pub fn register(
        &mut self,
        module: impl Into<String>,
        factory: ModuleFactory,
    ) -> Result<(), ModuleError> {
        let id = module.into();
        if id.trim().is_empty() {
            return Err(ModuleError::new("module identifier must not be empty"));
        }
        if self.factories.contains_key(&id) {
            return Err(ModuleError::new(format!(
                "module '{id}' is already registered"
            )));
        }
        self.factories.insert(id, factory);
        Ok(())
    }

    /// Looks up the constructor for `module`.
    #[must_use]
    pub fn get(&self, module: &str) -> Option<ModuleFactory> {
        self.factories.get(module).copied()
    }

    /// Iterates over registered module identifiers in order.
    pub fn modules(&self) -> impl Iterator<Item = &str> + '_ {
        self.factories.keys().map(String::as_str)
    }
}
