//! The two-level plugin registry and its builder.
//!
//! A [`Registry`] maps each active [`Category`] to its plugins keyed by name.
//! Both levels are ordered maps, so iteration is deterministic. Categories
//! that were not scanned are absent from [`Registry::categories`], while
//! [`Registry::category`] still answers with an empty map for them.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::category::Category;
use crate::error::InitError;
use crate::plugin::Plugin;

mod builder;

pub use self::builder::{CollisionPolicy, RegistryBuilder};

/// Plugins of one category, keyed by name.
pub type PluginMap = BTreeMap<String, Arc<dyn Plugin>>;

static NO_PLUGINS: PluginMap = BTreeMap::new();

/// Address of a plugin in the registry, written `<category>.<name>`.
///
/// # Example
///
/// ```
/// use homespun_discovery::{Category, PluginRef};
///
/// let reference: PluginRef = "listeners.http".parse().expect("valid reference");
/// assert_eq!(reference.category(), Category::Listeners);
/// assert_eq!(reference.name(), "http");
/// assert_eq!(reference.to_string(), "listeners.http");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PluginRef {
    category: Category,
    name: String,
}

impl PluginRef {
    /// Creates a reference to `name` within `category`.
    #[must_use]
    pub fn new(category: Category, name: impl Into<String>) -> Self {
        Self {
            category,
            name: name.into(),
        }
    }

    /// Returns the referenced category.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Returns the referenced plugin name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }
}

impl fmt::Display for PluginRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.category, self.name)
    }
}

impl FromStr for PluginRef {
    type Err = String;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let (category, name) = text
            .split_once('.')
            .ok_or_else(|| format!("plugin reference '{text}' must be '<category>.<name>'"))?;
        let parsed = Category::from_str(category)
            .map_err(|_| format!("plugin reference '{text}' names unknown category '{category}'"))?;
        if name.is_empty() {
            return Err(format!("plugin reference '{text}' has an empty name"));
        }
        Ok(Self::new(parsed, name))
    }
}

impl TryFrom<String> for PluginRef {
    type Error = String;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
    }
}

impl From<PluginRef> for String {
    fn from(reference: PluginRef) -> Self {
        reference.to_string()
    }
}

/// Completed mapping from category to plugin name to plugin.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    categories: BTreeMap<Category, PluginMap>,
}

impl Registry {
    /// Creates a registry with the given categories active and empty.
    #[must_use]
    pub fn with_categories(categories: &[Category]) -> Self {
        Self {
            categories: categories
                .iter()
                .map(|category| (*category, PluginMap::new()))
                .collect(),
        }
    }

    /// Returns the plugins of `category`.
    ///
    /// Categories that were not scanned yield an empty map.
    #[must_use]
    pub fn category(&self, category: Category) -> &PluginMap {
        self.categories.get(&category).unwrap_or(&NO_PLUGINS)
    }

    /// Returns `true` when `category` was scanned.
    #[must_use]
    pub fn is_active(&self, category: Category) -> bool {
        self.categories.contains_key(&category)
    }

    /// Iterates over the scanned categories in order.
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.categories.keys().copied()
    }

    /// Looks up a plugin by category and name.
    #[must_use]
    pub fn get(&self, category: Category, name: &str) -> Option<&Arc<dyn Plugin>> {
        self.category(category).get(name)
    }

    /// Looks up a plugin a hook depends on.
    ///
    /// # Errors
    ///
    /// Returns [`InitError::MissingPlugin`] when the plugin is not registered.
    pub fn require(&self, reference: &PluginRef) -> Result<&Arc<dyn Plugin>, InitError> {
        self.get(reference.category(), reference.name())
            .ok_or_else(|| InitError::MissingPlugin {
                category: reference.category(),
                name: reference.name().to_owned(),
            })
    }

    /// Iterates over every `(category, name, plugin)` entry in order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &str, &Arc<dyn Plugin>)> + '_ {
        self.categories.iter().flat_map(|(category, plugins)| {
            plugins
                .iter()
                .map(move |(name, plugin)| (*category, name.as_str(), plugin))
        })
    }

    /// Returns the total number of registered plugins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.values().map(BTreeMap::len).sum()
    }

    /// Returns `true` when no plugin is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Captures a serialisable view of the registry.
    #[must_use]
    pub fn snapshot(&self) -> RegistrySnapshot {
        let categories = self
            .categories
            .iter()
            .map(|(category, plugins)| {
                let entries = plugins
                    .iter()
                    .map(|(name, plugin)| {
                        let entry = PluginSnapshot {
                            module: plugin.module().to_owned(),
                            initializable: plugin.initializer().is_some(),
                            exports: plugin.exports().snapshot(),
                        };
                        (name.clone(), entry)
                    })
                    .collect();
                (*category, entries)
            })
            .collect();
        RegistrySnapshot { categories }
    }

    pub(crate) fn insert(
        &mut self,
        category: Category,
        name: String,
        plugin: Arc<dyn Plugin>,
    ) -> Option<Arc<dyn Plugin>> {
        self.categories
            .entry(category)
            .or_default()
            .insert(name, plugin)
    }
}

/// Serialisable point-in-time view of a [`Registry`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RegistrySnapshot {
    categories: BTreeMap<Category, BTreeMap<String, PluginSnapshot>>,
}

impl RegistrySnapshot {
    /// Returns the snapshot of one plugin.
    #[must_use]
    pub fn plugin(&self, category: Category, name: &str) -> Option<&PluginSnapshot> {
        self.categories.get(&category)?.get(name)
    }
}

/// Serialisable view of one plugin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluginSnapshot {
    module: String,
    initializable: bool,
    exports: BTreeMap<String, Value>,
}

impl PluginSnapshot {
    /// Returns the catalog module identifier.
    #[must_use]
    pub const fn module(&self) -> &str {
        self.module.as_str()
    }

    /// Returns `true` when the plugin exposes a `once` hook.
    #[must_use]
    pub const fn is_initializable(&self) -> bool {
        self.initializable
    }

    /// Returns the exports captured at snapshot time.
    #[must_use]
    pub const fn exports(&self) -> &BTreeMap<String, Value> {
        &self.exports
    }
}
