//! Filename convention matching and category directory scanning.
//!
//! A plugin file is named `<singular>-<name>.<ext>`, where `<singular>` is the
//! category's singular prefix and `<ext>` is one of
//! [`RECOGNISED_EXTENSIONS`]. The plugin's registry name is whatever sits
//! between the delimiter and the final extension.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::DiscoveryError;

/// File extensions accepted for plugin descriptors.
pub const RECOGNISED_EXTENSIONS: &[&str] = &["toml", "json"];

/// Separator between the singular prefix and the plugin name.
const DELIMITER: char = '-';

/// A descriptor file that matched the naming convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginFile {
    name: String,
    file_name: String,
    path: PathBuf,
}

impl PluginFile {
    /// Builds a plugin file entry for `path`, naming it with `singular`.
    ///
    /// Returns `None` when the file name does not follow the convention or
    /// the extracted name would be empty.
    #[must_use]
    pub fn from_path(path: &Path, singular: &str) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        if !matches_convention(file_name, singular) {
            return None;
        }
        let name = extract_name(file_name, singular);
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_owned(),
            file_name: file_name.to_owned(),
            path: path.to_path_buf(),
        })
    }

    /// Returns the plugin's registry name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the descriptor's file name.
    #[must_use]
    pub const fn file_name(&self) -> &str {
        self.file_name.as_str()
    }

    /// Returns the full path to the descriptor.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Returns `true` when `file_name` is `<singular>-<anything>.<ext>` with a
/// recognised extension.
///
/// # Example
///
/// ```
/// use homespun_discovery::matches_convention;
///
/// assert!(matches_convention("listener-http.toml", "listener"));
/// assert!(!matches_convention("observer-arp.toml", "listener"));
/// assert!(!matches_convention("listener-http.js", "listener"));
/// ```
#[must_use]
pub fn matches_convention(file_name: &str, singular: &str) -> bool {
    strip_prefix(file_name, singular)
        .and_then(|rest| rest.rsplit_once('.'))
        .is_some_and(|(_, extension)| RECOGNISED_EXTENSIONS.contains(&extension))
}

/// Derives the plugin name from a file name that matched the convention.
///
/// The singular prefix, the delimiter, and the final extension are removed.
/// Inner dots survive, so `listener-a.b.toml` yields `a.b`.
///
/// # Example
///
/// ```
/// use homespun_discovery::extract_name;
///
/// assert_eq!(extract_name("utility-sensortypes.toml", "utility"), "sensortypes");
/// ```
#[must_use]
pub fn extract_name<'a>(file_name: &'a str, singular: &str) -> &'a str {
    let rest = strip_prefix(file_name, singular).unwrap_or(file_name);
    rest.rsplit_once('.').map_or(rest, |(stem, _)| stem)
}

fn strip_prefix<'a>(file_name: &'a str, singular: &str) -> Option<&'a str> {
    file_name
        .strip_prefix(singular)
        .and_then(|rest| rest.strip_prefix(DELIMITER))
}

/// Lists descriptor files directly inside `dir` that follow the convention.
///
/// Results are sorted by file name. Entries that are not regular files
/// (after following symlinks), have non-UTF-8 names, or would produce an
/// empty plugin name are skipped. A missing directory yields an empty list.
///
/// # Errors
///
/// Returns [`DiscoveryError::Scan`] when `dir` exists but cannot be listed.
pub fn scan_category(dir: &Path, singular: &str) -> Result<Vec<PluginFile>, DiscoveryError> {
    let scan_error = |source: io::Error| DiscoveryError::Scan {
        path: dir.to_path_buf(),
        source: Arc::new(source),
    };

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %dir.display(), "category directory does not exist, skipping");
            return Ok(Vec::new());
        }
        Err(error) => return Err(scan_error(error)),
    };

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(scan_error)?.path();
        let Some(file) = PluginFile::from_path(&path, singular) else {
            let empty_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| matches_convention(name, singular));
            if empty_name {
                tracing::debug!(path = %path.display(), "plugin file has an empty name, skipping");
            }
            continue;
        };
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "matching entry is not a file, skipping");
            continue;
        }
        files.push(file);
    }

    files.sort_by(|left, right| left.file_name.cmp(&right.file_name));
    Ok(files)
}

#[cfg(test)]
mod tests;
