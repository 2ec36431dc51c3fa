//! Convention-based plugin discovery and registration for homespun.
//!
//! A plugin root holds one directory per [`Category`]. Each directory contains
//! descriptor files named `<singular>-<name>.<ext>`, for example
//! `listeners/listener-http.toml`. Discovery runs in two strictly ordered
//! phases:
//!
//! 1. **Load.** The active categories are resolved from the host identity,
//!    every matching file is loaded through a [`PluginLoader`], and the
//!    results are assembled into a [`Registry`] keyed by category and name.
//! 2. **Initialise.** Every plugin that exposes the [`Initializable`]
//!    capability has its `once` hook invoked exactly one time with the
//!    completed registry, so plugins can look each other up.
//!
//! Descriptor files do not contain code. They name a module from the
//! statically declared [`ModuleCatalog`] and supply the data that module is
//! built from. Failures are fail-fast: a broken descriptor or a failing hook
//! aborts discovery with a [`DiscoveryError`].
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use homespun_discovery::{Category, DiscoveryOptions, discover};
//!
//! # fn main() -> Result<(), homespun_discovery::DiscoveryError> {
//! let registry = discover(Path::new("/opt/homespun/plugins"), &DiscoveryOptions::default())?;
//! for (name, plugin) in registry.category(Category::Listeners) {
//!     println!("{name}: {}", plugin.module());
//! }
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod category;
pub mod discovery;
pub mod error;
pub mod initializer;
pub mod loader;
pub mod manifest;
pub mod plugin;
pub mod registry;
pub mod scanner;

#[cfg(test)]
mod tests;

pub use self::catalog::{ModuleCatalog, ModuleError, ModuleFactory, ModuleSource};
pub use self::category::{Category, HostIdentity, SELF_PACKAGE_NAME, active_categories};
pub use self::discovery::{Discovery, DiscoveryOptions, discover};
pub use self::error::{DiscoveryError, InitError};
pub use self::initializer::{InitReport, initialise};
pub use self::loader::{ManifestLoader, PluginLoader};
pub use self::manifest::{ManifestFormat, ModuleManifest, OnceSpec};
pub use self::plugin::{Exports, Initializable, Plugin};
pub use self::registry::{
    CollisionPolicy, PluginMap, PluginRef, PluginSnapshot, Registry, RegistryBuilder,
    RegistrySnapshot,
};
pub use self::scanner::{PluginFile, extract_name, matches_convention, scan_category};
