//! Plugin categories, their filename prefixes, and the active-set rule.
//!
//! Every category maps to one directory under the plugin root and to a
//! singular prefix that plugin filenames in that directory must carry. The
//! set of categories scanned depends on whether the loader is hosting itself
//! (see [`active_categories`]).

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Package name the loader identifies itself by.
///
/// A host declaring this name is the loader's own utilities package, which
/// must not scan the categories that would depend back on it.
pub const SELF_PACKAGE_NAME: &str = "homespun-utilities";

/// Grouping of plugins backed by one directory and one naming prefix.
///
/// Variants are declared in scan order; the derived ordering is what keeps
/// registry traversal deterministic.
///
/// # Example
///
/// ```
/// use homespun_discovery::Category;
///
/// assert_eq!(Category::Utilities.as_str(), "utilities");
/// assert_eq!(Category::Utilities.singular(), "utility");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Category {
    /// Inbound endpoints other plugins attach to (e.g. an HTTP listener).
    Listeners,
    /// Passive network observers (ARP, mDNS, SSDP, SNMP).
    Observers,
    /// Event subscriptions against remote devices.
    Subscribers,
    /// Shared helpers and data tables.
    Utilities,
}

impl Category {
    /// Every category, in scan order.
    pub const ALL: [Self; 4] = [
        Self::Listeners,
        Self::Observers,
        Self::Subscribers,
        Self::Utilities,
    ];

    /// Returns the directory name for this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Listeners => "listeners",
            Self::Observers => "observers",
            Self::Subscribers => "subscribers",
            Self::Utilities => "utilities",
        }
    }

    /// Returns the filename prefix plugins in this category must carry.
    #[must_use]
    pub fn singular(self) -> String {
        singularize(self.as_str())
    }
}

/// Reduces a plural category name to its singular form.
///
/// `-ies` becomes `-y`; otherwise a single trailing `s` is dropped. Words
/// without a plural suffix are returned unchanged.
#[must_use]
pub fn singularize(plural: &str) -> String {
    if let Some(stem) = plural.strip_suffix("ies") {
        return format!("{stem}y");
    }
    plural.strip_suffix('s').unwrap_or(plural).to_owned()
}

/// Identity of the package hosting the loader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostIdentity {
    self_host: bool,
}

impl HostIdentity {
    /// Creates an identity from an explicit self-hosting flag.
    #[must_use]
    pub const fn new(self_host: bool) -> Self {
        Self { self_host }
    }

    /// Derives the identity from the host's declared package name.
    #[must_use]
    pub fn from_package_name(package_name: &str) -> Self {
        Self::new(package_name.trim() == SELF_PACKAGE_NAME)
    }

    /// Returns `true` when the loader is scanning its own package.
    #[must_use]
    pub const fn is_self_host(self) -> bool {
        self.self_host
    }
}

/// Returns the categories to scan for the given host.
///
/// A self-hosting loader only scans [`Category::Utilities`]; every other host
/// scans all categories in [`Category::ALL`] order.
///
/// # Example
///
/// ```
/// use homespun_discovery::{Category, HostIdentity, active_categories};
///
/// let own = active_categories(HostIdentity::from_package_name("homespun-utilities"));
/// assert_eq!(own, &[Category::Utilities]);
/// ```
#[must_use]
pub const fn active_categories(host: HostIdentity) -> &'static [Category] {
    if host.is_self_host() {
        &[Category::Utilities]
    } else {
        &Category::ALL
    }
}
