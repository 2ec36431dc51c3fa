//! The plugin module contract.
//!
//! Every loaded plugin is shared as `Arc<dyn Plugin>`. Plugins carry an
//! [`Exports`] bag of named values that they, and any other plugin holding the
//! registry, may read or attach state to. A plugin that needs to run once
//! after every plugin has loaded implements [`Initializable`] and returns
//! itself from [`Plugin::initializer`].

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};

use serde_json::{Map, Value};

use crate::error::InitError;
use crate::registry::Registry;

/// A loaded plugin module.
pub trait Plugin: Any + Send + Sync + fmt::Debug {
    /// Identifier of the catalog module that built this plugin.
    fn module(&self) -> &str;

    /// Named values exposed by this plugin.
    fn exports(&self) -> &Exports;

    /// Returns the one-time initialisation capability, when present.
    fn initializer(&self) -> Option<&dyn Initializable> {
        None
    }
}

impl dyn Plugin {
    /// Recovers the concrete plugin type.
    ///
    /// # Example
    ///
    /// ```
    /// use homespun_discovery::{Exports, Plugin};
    ///
    /// #[derive(Debug, Default)]
    /// struct Greeter {
    ///     exports: Exports,
    /// }
    ///
    /// impl Greeter {
    ///     fn greet(&self) -> &'static str {
    ///         "hi"
    ///     }
    /// }
    ///
    /// impl Plugin for Greeter {
    ///     fn module(&self) -> &str {
    ///         "greeter"
    ///     }
    ///
    ///     fn exports(&self) -> &Exports {
    ///         &self.exports
    ///     }
    /// }
    ///
    /// let plugin: Box<dyn Plugin> = Box::new(Greeter::default());
    /// let greeter = plugin.downcast_ref::<Greeter>().expect("plugin is a greeter");
    /// assert_eq!(greeter.greet(), "hi");
    /// ```
    #[must_use]
    pub fn downcast_ref<T: Plugin>(&self) -> Option<&T> {
        let any: &dyn Any = self;
        any.downcast_ref::<T>()
    }
}

/// One-time initialisation hook.
///
/// Discovery calls [`Initializable::once`] exactly one time per run, after
/// the registry is complete. Hooks must not rely on the order in which
/// sibling plugins are initialised.
pub trait Initializable {
    /// Runs the hook with the fully populated registry.
    ///
    /// # Errors
    ///
    /// Returns an [`InitError`] when the plugin cannot initialise; discovery
    /// aborts and surfaces the error to its caller.
    fn once(&self, registry: &Registry) -> Result<(), InitError>;
}

/// Thread-safe bag of named values attached to a plugin.
#[derive(Default)]
pub struct Exports {
    values: RwLock<BTreeMap<String, Value>>,
}

impl Exports {
    /// Creates a bag seeded with `values`.
    #[must_use]
    pub fn new(values: Map<String, Value>) -> Self {
        Self {
            values: RwLock::new(values.into_iter().collect()),
        }
    }

    /// Returns a copy of the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Returns `true` when `key` has a value.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    /// Stores `value` under `key`, returning the value it replaced.
    pub fn set(&self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value)
    }

    /// Returns a point-in-time copy of every value.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` when nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Exports {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.snapshot()).finish()
    }
}
