//! Unit tests for filename matching and directory scanning.

use std::fs;

use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::*;

#[fixture]
fn category_dir() -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    for name in [
        "listener-http.toml",
        "listener-coap.json",
        "listener-ws.js",
        "observer-arp.toml",
        "README.md",
    ] {
        fs::write(dir.path().join(name), "").expect("write fixture file");
    }
    dir
}

// ---------------------------------------------------------------------------
// Convention matching
// ---------------------------------------------------------------------------

#[rstest]
#[case::toml("listener-http.toml", true)]
#[case::json("listener-http.json", true)]
#[case::dotted_name("listener-http.v2.toml", true)]
#[case::empty_name("listener-.toml", true)]
#[case::wrong_extension("listener-http.js", false)]
#[case::no_extension("listener-http", false)]
#[case::no_delimiter("listenerhttp.toml", false)]
#[case::other_prefix("observer-arp.toml", false)]
#[case::prefix_only("listener.toml", false)]
fn convention_matching(#[case] file_name: &str, #[case] expected: bool) {
    assert_eq!(
        matches_convention(file_name, "listener"),
        expected,
        "unexpected match result for '{file_name}'"
    );
}

#[rstest]
#[case::simple("listener-http.toml", "http")]
#[case::hyphenated("listener-push-sensor.json", "push-sensor")]
#[case::dotted("listener-http.v2.toml", "http.v2")]
fn name_extraction(#[case] file_name: &str, #[case] expected: &str) {
    assert_eq!(extract_name(file_name, "listener"), expected);
}

#[test]
fn plugin_file_rejects_empty_name() {
    let path = Path::new("/plugins/listeners/listener-.toml");
    assert!(PluginFile::from_path(path, "listener").is_none());
}

#[test]
fn plugin_file_records_name_and_path() {
    let path = Path::new("/plugins/utilities/utility-roundtrip.toml");
    let file = PluginFile::from_path(path, "utility").expect("file matches");
    assert_eq!(file.name(), "roundtrip");
    assert_eq!(file.file_name(), "utility-roundtrip.toml");
    assert_eq!(file.path(), path);
}

// ---------------------------------------------------------------------------
// Directory scanning
// ---------------------------------------------------------------------------

#[rstest]
fn scan_returns_only_matching_files(category_dir: TempDir) {
    let files = scan_category(category_dir.path(), "listener").expect("scan");
    let names: Vec<&str> = files.iter().map(PluginFile::name).collect();
    assert_eq!(names, vec!["coap", "http"]);
}

#[rstest]
fn scan_is_sorted_by_file_name(category_dir: TempDir) {
    fs::write(category_dir.path().join("listener-aardvark.toml"), "").expect("write");
    let files = scan_category(category_dir.path(), "listener").expect("scan");
    let file_names: Vec<&str> = files.iter().map(PluginFile::file_name).collect();
    let mut sorted = file_names.clone();
    sorted.sort_unstable();
    assert_eq!(file_names, sorted);
}

#[rstest]
fn scan_skips_matching_directories(category_dir: TempDir) {
    fs::create_dir(category_dir.path().join("listener-nested.toml")).expect("mkdir");
    let files = scan_category(category_dir.path(), "listener").expect("scan");
    assert!(files.iter().all(|file| file.name() != "nested"));
}

#[test]
fn scan_of_missing_directory_is_empty() {
    let dir = TempDir::new().expect("create temp dir");
    let files = scan_category(&dir.path().join("observers"), "observer").expect("scan");
    assert!(files.is_empty());
}

#[test]
fn scan_of_regular_file_fails() {
    let dir = TempDir::new().expect("create temp dir");
    let not_a_dir = dir.path().join("subscribers");
    fs::write(&not_a_dir, "").expect("write file");
    let error = scan_category(&not_a_dir, "subscriber").expect_err("scan should fail");
    assert!(matches!(error, DiscoveryError::Scan { .. }));
}

#[cfg(unix)]
#[test]
fn scan_follows_symlinked_files() {
    let dir = TempDir::new().expect("create temp dir");
    let target = dir.path().join("shared.toml");
    fs::write(&target, "").expect("write target");
    std::os::unix::fs::symlink(&target, dir.path().join("utility-linked.toml")).expect("symlink");
    let files = scan_category(dir.path(), "utility").expect("scan");
    let names: Vec<&str> = files.iter().map(PluginFile::name).collect();
    assert_eq!(names, vec!["linked"]);
}
