//! Populating a [`Registry`] from a plugin root directory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::Registry;
use crate::category::Category;
use crate::error::DiscoveryError;
use crate::loader::PluginLoader;
use crate::scanner::scan_category;

/// What to do when two files in one category yield the same plugin name.
///
/// Files are visited in file-name order, so under
/// [`CollisionPolicy::LastWriteWins`] the lexically last file wins.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum CollisionPolicy {
    /// Keep the later file's plugin and log a warning.
    #[default]
    LastWriteWins,
    /// Abort discovery with [`DiscoveryError::NameCollision`].
    Reject,
}

/// Scans category directories and loads every matching file.
#[derive(Debug)]
pub struct RegistryBuilder<L> {
    loader: L,
    policy: CollisionPolicy,
}

impl<L: PluginLoader> RegistryBuilder<L> {
    /// Creates a builder loading plugins through `loader`.
    #[must_use]
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            policy: CollisionPolicy::default(),
        }
    }

    /// Sets the collision policy.
    #[must_use]
    pub const fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the collision policy in effect.
    #[must_use]
    pub const fn collision_policy(&self) -> CollisionPolicy {
        self.policy
    }

    /// Consumes the builder, returning its loader.
    pub fn into_loader(self) -> L {
        self.loader
    }

    /// Builds a registry holding every plugin found under `root` for the
    /// given `categories`.
    ///
    /// Each category is scanned in `root/<category>`. Every listed category
    /// is present in the result, even when its directory is missing or
    /// empty. Loading stops at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first scan or load error, or
    /// [`DiscoveryError::NameCollision`] under [`CollisionPolicy::Reject`].
    pub fn build(
        &mut self,
        root: &Path,
        categories: &[Category],
    ) -> Result<Registry, DiscoveryError> {
        let mut registry = Registry::with_categories(categories);
        let mut origins: HashMap<(Category, String), PathBuf> = HashMap::new();

        for &category in categories {
            let dir = root.join(category.as_str());
            let files = scan_category(&dir, &category.singular())?;
            tracing::debug!(
                category = %category,
                dir = %dir.display(),
                matched = files.len(),
                "scanned category directory"
            );

            for file in files {
                let plugin = self.loader.load(category, &file)?;
                let key = (category, file.name().to_owned());
                if let Some(existing) = origins.get(&key) {
                    match self.policy {
                        CollisionPolicy::Reject => {
                            return Err(DiscoveryError::NameCollision {
                                category,
                                name: key.1,
                                existing: existing.clone(),
                                incoming: file.path().to_path_buf(),
                            });
                        }
                        CollisionPolicy::LastWriteWins => tracing::warn!(
                            category = %category,
                            plugin = file.name(),
                            replaced = %existing.display(),
                            by = %file.path().display(),
                            "plugin name collision; later file wins"
                        ),
                    }
                }
                registry.insert(category, key.1.clone(), plugin);
                origins.insert(key, file.path().to_path_buf());
            }
        }

        Ok(registry)
    }
}
