//! Running `once` hooks against a completed registry.
//!
//! Initialisation starts only after every active category has been scanned
//! and loaded, so hooks always observe the full registry. A plugin instance
//! registered under several names is initialised once.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::DiscoveryError;
use crate::registry::{PluginRef, Registry};

/// Outcome of a successful initialisation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitReport {
    initialised: Vec<PluginRef>,
}

impl InitReport {
    /// Returns the plugins whose hook ran, in traversal order.
    #[must_use]
    pub const fn initialised(&self) -> &[PluginRef] {
        self.initialised.as_slice()
    }

    /// Returns the number of hooks that ran.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.initialised.len()
    }

    /// Returns `true` when no hook ran.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.initialised.is_empty()
    }
}

/// Invokes every plugin's `once` hook in registry order.
///
/// Plugins without a hook are skipped. Each distinct plugin instance runs its
/// hook at most once, even when it is registered under several names.
///
/// # Errors
///
/// Returns [`DiscoveryError::Init`] for the first hook that fails; later
/// hooks do not run.
pub fn initialise(registry: &Registry) -> Result<InitReport, DiscoveryError> {
    let mut seen = HashSet::new();
    let mut report = InitReport::default();

    for (category, name, plugin) in registry.iter() {
        let Some(hook) = plugin.initializer() else {
            continue;
        };
        if !seen.insert(Arc::as_ptr(plugin).cast::<()>()) {
            tracing::debug!(
                category = %category,
                plugin = name,
                "plugin already initialised under another name"
            );
            continue;
        }

        hook.once(registry)
            .map_err(|source| DiscoveryError::Init {
                category,
                name: name.to_owned(),
                source,
            })?;
        tracing::debug!(category = %category, plugin = name, "plugin initialised");
        report.initialised.push(PluginRef::new(category, name));
    }

    Ok(report)
}
