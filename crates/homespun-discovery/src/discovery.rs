//! End-to-end discovery: resolve categories, build the registry, initialise.

use std::path::Path;

use crate::category::{HostIdentity, active_categories};
use crate::error::DiscoveryError;
use crate::initializer::initialise;
use crate::loader::{ManifestLoader, PluginLoader};
use crate::registry::{CollisionPolicy, Registry, RegistryBuilder};

/// Settings for a discovery run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscoveryOptions {
    host: HostIdentity,
    collision_policy: CollisionPolicy,
}

impl DiscoveryOptions {
    /// Creates options for a foreign host with the default collision policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether the loader is hosting its own package.
    #[must_use]
    pub const fn with_self_host(mut self, self_host: bool) -> Self {
        self.host = HostIdentity::new(self_host);
        self
    }

    /// Sets the host identity.
    #[must_use]
    pub const fn with_host(mut self, host: HostIdentity) -> Self {
        self.host = host;
        self
    }

    /// Sets the collision policy.
    #[must_use]
    pub const fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }

    /// Returns the host identity.
    #[must_use]
    pub const fn host(&self) -> HostIdentity {
        self.host
    }

    /// Returns the collision policy.
    #[must_use]
    pub const fn collision_policy(&self) -> CollisionPolicy {
        self.collision_policy
    }
}

/// Discovery pipeline over a caller-supplied loader.
///
/// Use this instead of [`discover`] to resolve modules through a custom
/// [`ModuleCatalog`](crate::ModuleCatalog) or an entirely different
/// [`PluginLoader`].
///
/// # Example
///
/// ```no_run
/// use homespun_discovery::{Discovery, DiscoveryOptions, ManifestLoader, ModuleCatalog};
///
/// let loader = ManifestLoader::new(ModuleCatalog::builtin());
/// let mut discovery = Discovery::new(loader, DiscoveryOptions::new());
/// let registry = discovery.run("/srv/homespun/plugins".as_ref())?;
/// println!("{} plugins", registry.len());
/// # Ok::<(), homespun_discovery::DiscoveryError>(())
/// ```
#[derive(Debug)]
pub struct Discovery<L> {
    builder: RegistryBuilder<L>,
    options: DiscoveryOptions,
}

impl<L: PluginLoader> Discovery<L> {
    /// Creates a pipeline using `loader` and `options`.
    #[must_use]
    pub fn new(loader: L, options: DiscoveryOptions) -> Self {
        Self {
            builder: RegistryBuilder::new(loader)
                .with_collision_policy(options.collision_policy()),
            options,
        }
    }

    /// Returns the options in effect.
    #[must_use]
    pub const fn options(&self) -> &DiscoveryOptions {
        &self.options
    }

    /// Discovers, registers, and initialises every plugin under `root`.
    ///
    /// The registry is complete before any `once` hook runs.
    ///
    /// # Errors
    ///
    /// Returns the first scan, load, collision, or initialisation error. No
    /// partially built registry is returned.
    pub fn run(&mut self, root: &Path) -> Result<Registry, DiscoveryError> {
        let categories = active_categories(self.options.host());
        tracing::debug!(
            root = %root.display(),
            self_host = self.options.host().is_self_host(),
            "starting plugin discovery"
        );

        let registry = self.builder.build(root, categories)?;
        let report = initialise(&registry)?;

        for category in registry.categories() {
            tracing::info!(
                category = %category,
                plugins = registry.category(category).len(),
                "category registered"
            );
        }
        tracing::info!(
            root = %root.display(),
            plugins = registry.len(),
            initialised = report.len(),
            "plugin discovery complete"
        );
        Ok(registry)
    }
}

/// Discovers every plugin under `root` using the built-in module catalog.
///
/// # Errors
///
/// See [`Discovery::run`].
pub fn discover(root: &Path, options: &DiscoveryOptions) -> Result<Registry, DiscoveryError> {
    Discovery::new(ManifestLoader::default(), *options).run(root)
}
