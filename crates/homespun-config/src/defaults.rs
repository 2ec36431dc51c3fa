//! Built-in configuration defaults.

use camino::Utf8PathBuf;
use homespun_discovery::CollisionPolicy;

use crate::logging::LogFormat;

/// Plugin root used when none is configured, relative to the working
/// directory.
pub const DEFAULT_PLUGIN_ROOT: &str = "plugins";

/// Default log filter expression used by the binary.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default plugin root directory.
#[must_use]
pub fn default_root() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_PLUGIN_ROOT)
}

/// Default log filter expression used by the binary.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binary.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Default handling of plugin name collisions.
#[must_use]
pub const fn default_collision_policy() -> CollisionPolicy {
    CollisionPolicy::LastWriteWins
}
