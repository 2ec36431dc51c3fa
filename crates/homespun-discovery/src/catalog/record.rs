//! The `record` module: a data plugin with an optional declarative hook.
//!
//! A record plugin exposes the `[exports]` table of its descriptor. When the
//! descriptor has a `[once]` section, the plugin becomes
//! [`Initializable`]: at initialisation it checks that every required plugin
//! is registered, then attaches the `set` values to its target.

use std::sync::Arc;

use crate::catalog::{ModuleError, ModuleSource};
use crate::error::InitError;
use crate::manifest::OnceSpec;
use crate::plugin::{Exports, Initializable, Plugin};
use crate::registry::{PluginRef, Registry};

/// Identifier of this module in the catalog.
pub const MODULE_ID: &str = "record";

/// Plugin built from a descriptor's data.
#[derive(Debug)]
pub struct RecordPlugin {
    origin: PluginRef,
    description: Option<String>,
    exports: Exports,
    once: Option<OnceSpec>,
}

impl RecordPlugin {
    /// Returns the registry address the plugin was loaded for.
    #[must_use]
    pub const fn origin(&self) -> &PluginRef {
        &self.origin
    }

    /// Returns the descriptor's description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl Plugin for RecordPlugin {
    fn module(&self) -> &str {
        MODULE_ID
    }

    fn exports(&self) -> &Exports {
        &self.exports
    }

    fn initializer(&self) -> Option<&dyn Initializable> {
        self.once.as_ref().map(|_| self as &dyn Initializable)
    }
}

impl Initializable for RecordPlugin {
    fn once(&self, registry: &Registry) -> Result<(), InitError> {
        let Some(spec) = self.once.as_ref() else {
            return Ok(());
        };

        for required in spec.requires() {
            registry.require(required)?;
        }

        let target_ref = spec.target().unwrap_or(&self.origin);
        let target = registry.require(target_ref)?;
        for (key, value) in spec.set() {
            target.exports().set(key.clone(), value.clone());
        }

        tracing::debug!(
            plugin = %self.origin,
            target = %target_ref,
            attached = spec.set().len(),
            "record hook completed"
        );
        Ok(())
    }
}

/// Builds a [`RecordPlugin`] from its descriptor.
///
/// # Errors
///
/// Infallible for well-formed manifests; the signature matches
/// [`ModuleFactory`](crate::catalog::ModuleFactory).
pub fn build(source: &ModuleSource<'_>) -> Result<Arc<dyn Plugin>, ModuleError> {
    let manifest = source.manifest();
    Ok(Arc::new(RecordPlugin {
        origin: source.reference(),
        description: manifest.description().map(str::to_owned),
        exports: Exports::new(manifest.exports().clone()),
        once: manifest.once().cloned(),
    }))
}
