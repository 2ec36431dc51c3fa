//! Layered configuration for the homespun plugin loader.
//!
//! [`Config`] is assembled by `ortho_config` from, in increasing precedence,
//! built-in defaults, a TOML configuration file (`--config-path` or
//! `HOMESPUN_CONFIG_PATH`), `HOMESPUN_*` environment variables, and command
//! line flags.

use camino::{Utf8Path, Utf8PathBuf};
use homespun_discovery::{CollisionPolicy, DiscoveryOptions, HostIdentity};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

mod defaults;
mod logging;

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_PLUGIN_ROOT, default_collision_policy, default_log_filter,
    default_log_filter_string, default_log_format, default_root,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Settings for one discovery run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "HOMESPUN")]
pub struct Config {
    /// Directory holding one subdirectory per plugin category.
    #[ortho_config(default = default_root())]
    pub root: Utf8PathBuf,
    /// Scan only the utilities category, as the loader's own package does.
    #[ortho_config(default = false)]
    pub self_host: bool,
    /// Package name of the host; the loader's own name implies self-hosting.
    pub package_name: Option<String>,
    /// Handling of two files yielding the same plugin name.
    #[ortho_config(default = default_collision_policy())]
    pub on_collision: CollisionPolicy,
    /// `tracing` filter expression.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Log output format.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: default_root(),
            self_host: false,
            package_name: None,
            on_collision: default_collision_policy(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Returns the plugin root directory.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        self.root.as_path()
    }

    /// Returns the declared host package name.
    #[must_use]
    pub fn package_name(&self) -> Option<&str> {
        self.package_name.as_deref()
    }

    /// Returns the collision policy.
    #[must_use]
    pub const fn on_collision(&self) -> CollisionPolicy {
        self.on_collision
    }

    /// Returns the log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Returns the log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Resolves the host identity.
    ///
    /// The explicit flag wins; otherwise the identity is derived from the
    /// package name.
    #[must_use]
    pub fn host_identity(&self) -> HostIdentity {
        if self.self_host {
            return HostIdentity::new(true);
        }
        self.package_name()
            .map_or_else(HostIdentity::default, HostIdentity::from_package_name)
    }

    /// Builds the options for a discovery run.
    #[must_use]
    pub fn discovery_options(&self) -> DiscoveryOptions {
        DiscoveryOptions::new()
            .with_host(self.host_identity())
            .with_collision_policy(self.on_collision)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.root(), Utf8Path::new("plugins"));
        assert_eq!(config.log_filter(), "info");
        assert_eq!(config.log_format(), LogFormat::Json);
        assert_eq!(config.on_collision(), CollisionPolicy::LastWriteWins);
        assert!(!config.host_identity().is_self_host());
    }

    #[rstest]
    #[case::flag(true, None, true)]
    #[case::own_package(false, Some("homespun-utilities"), true)]
    #[case::foreign_package(false, Some("homespun-hub"), false)]
    #[case::flag_beats_name(true, Some("homespun-hub"), true)]
    #[case::nothing(false, None, false)]
    fn host_identity_resolution(
        #[case] self_host: bool,
        #[case] package_name: Option<&str>,
        #[case] expected: bool,
    ) {
        let config = Config {
            self_host,
            package_name: package_name.map(str::to_owned),
            ..Config::default()
        };
        assert_eq!(config.host_identity().is_self_host(), expected);
        assert_eq!(
            config.discovery_options().host().is_self_host(),
            expected
        );
    }
}
