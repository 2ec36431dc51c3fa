//! Turning matched descriptor files into plugin modules.
//!
//! The [`PluginLoader`] abstraction lets the registry builder stay ignorant of
//! how a file becomes a plugin. The production [`ManifestLoader`] parses the
//! file as a [`ModuleManifest`](crate::manifest::ModuleManifest) and hands it
//! to the constructor the [`ModuleCatalog`] lists for the named module.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::catalog::{ModuleCatalog, ModuleSource};
use crate::category::Category;
use crate::error::DiscoveryError;
use crate::manifest::ManifestFormat;
use crate::plugin::Plugin;
use crate::scanner::PluginFile;

/// Trait abstracting plugin loading for testability.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use homespun_discovery::{
///     Category, DiscoveryError, Exports, Plugin, PluginFile, PluginLoader,
/// };
///
/// #[derive(Debug, Default)]
/// struct Inert {
///     exports: Exports,
/// }
///
/// impl Plugin for Inert {
///     fn module(&self) -> &str {
///         "inert"
///     }
///
///     fn exports(&self) -> &Exports {
///         &self.exports
///     }
/// }
///
/// struct InertLoader;
///
/// impl PluginLoader for InertLoader {
///     fn load(
///         &mut self,
///         _category: Category,
///         _file: &PluginFile,
///     ) -> Result<Arc<dyn Plugin>, DiscoveryError> {
///         Ok(Arc::new(Inert::default()))
///     }
/// }
/// ```
pub trait PluginLoader {
    /// Loads the plugin described by `file` in `category`.
    ///
    /// # Errors
    ///
    /// Returns a [`DiscoveryError`] when the file cannot be read, parsed, or
    /// turned into a module. Callers treat every error as fatal.
    fn load(
        &mut self,
        category: Category,
        file: &PluginFile,
    ) -> Result<Arc<dyn Plugin>, DiscoveryError>;
}

/// Loader that builds plugins from descriptor manifests.
///
/// Loaded plugins are cached by canonical path, so a descriptor reached
/// through several files (for example via symlinks) yields one shared
/// plugin.
#[derive(Debug)]
pub struct ManifestLoader {
    catalog: ModuleCatalog,
    cache: HashMap<PathBuf, Arc<dyn Plugin>>,
}

impl Default for ManifestLoader {
    fn default() -> Self {
        Self::new(ModuleCatalog::builtin())
    }
}

impl ManifestLoader {
    /// Creates a loader resolving modules through `catalog`.
    #[must_use]
    pub fn new(catalog: ModuleCatalog) -> Self {
        Self {
            catalog,
            cache: HashMap::new(),
        }
    }

    /// Returns the catalog used to resolve modules.
    #[must_use]
    pub const fn catalog(&self) -> &ModuleCatalog {
        &self.catalog
    }

    fn build(&self, category: Category, file: &PluginFile) -> Result<Arc<dyn Plugin>, DiscoveryError> {
        let path = file.path();
        let format = ManifestFormat::from_path(path).ok_or_else(|| {
            DiscoveryError::UnsupportedFormat {
                path: path.to_path_buf(),
            }
        })?;
        let text = fs::read_to_string(path).map_err(|source| DiscoveryError::Read {
            path: path.to_path_buf(),
            source: Arc::new(source),
        })?;
        let manifest = format
            .parse(&text)
            .map_err(|message| DiscoveryError::Parse {
                path: path.to_path_buf(),
                message,
            })?;
        let factory = self.catalog.get(manifest.module()).ok_or_else(|| {
            DiscoveryError::UnknownModule {
                path: path.to_path_buf(),
                module: manifest.module().to_owned(),
            }
        })?;

        let source = ModuleSource::new(category, file.name(), path, &manifest);
        factory(&source).map_err(|error| DiscoveryError::Module {
            path: path.to_path_buf(),
            message: error.to_string(),
        })
    }
}

impl PluginLoader for ManifestLoader {
    fn load(
        &mut self,
        category: Category,
        file: &PluginFile,
    ) -> Result<Arc<dyn Plugin>, DiscoveryError> {
        let key = fs::canonicalize(file.path()).map_err(|source| DiscoveryError::Read {
            path: file.path().to_path_buf(),
            source: Arc::new(source),
        })?;
        if let Some(plugin) = self.cache.get(&key) {
            tracing::debug!(
                path = %file.path().display(),
                resolved = %key.display(),
                "reusing plugin loaded from the same file"
            );
            return Ok(Arc::clone(plugin));
        }

        let plugin = self.build(category, file)?;
        tracing::debug!(
            category = %category,
            plugin = file.name(),
            module = plugin.module(),
            "loaded plugin"
        );
        self.cache.insert(key, Arc::clone(&plugin));
        Ok(plugin)
    }
}
