//! Unit tests for module manifest parsing.

use std::path::Path;

use rstest::rstest;
use serde_json::json;

use super::*;
use crate::category::Category;

#[rstest]
#[case::toml("listener-http.toml", Some(ManifestFormat::Toml))]
#[case::json("listener-http.json", Some(ManifestFormat::Json))]
#[case::javascript("listener-http.js", None)]
#[case::bare("listener-http", None)]
fn format_follows_extension(#[case] file: &str, #[case] expected: Option<ManifestFormat>) {
    assert_eq!(ManifestFormat::from_path(Path::new(file)), expected);
}

#[test]
fn empty_toml_is_a_default_record() {
    let manifest = ManifestFormat::Toml.parse("").expect("empty toml parses");
    assert_eq!(manifest, ModuleManifest::default());
    assert_eq!(manifest.module(), DEFAULT_MODULE);
    assert!(manifest.once().is_none());
}

#[test]
fn full_toml_manifest_parses() {
    let text = r#"
module = "record"
description = "UPnP event subscriber"

[exports]
timeout_secs = 300

[once]
requires = ["listeners.http", "utilities.roundtrip"]
target = "utilities.roundtrip"
set = { ready = true }
"#;
    let manifest = ManifestFormat::Toml.parse(text).expect("manifest parses");
    assert_eq!(manifest.description(), Some("UPnP event subscriber"));
    assert_eq!(manifest.exports().get("timeout_secs"), Some(&json!(300)));

    let once = manifest.once().expect("once section present");
    assert_eq!(
        once.requires(),
        &[
            PluginRef::new(Category::Listeners, "http"),
            PluginRef::new(Category::Utilities, "roundtrip"),
        ]
    );
    assert_eq!(
        once.target(),
        Some(&PluginRef::new(Category::Utilities, "roundtrip"))
    );
    assert_eq!(once.set().get("ready"), Some(&json!(true)));
}

#[test]
fn json_manifest_parses() {
    let text = r#"{ "module": "sensor-types", "exports": { "greet": "hi" } }"#;
    let manifest = ManifestFormat::Json.parse(text).expect("manifest parses");
    assert_eq!(manifest.module(), "sensor-types");
    assert_eq!(manifest.exports().get("greet"), Some(&json!("hi")));
}

#[rstest]
#[case::broken_toml(ManifestFormat::Toml, "module = ")]
#[case::broken_json(ManifestFormat::Json, "{ \"module\": ")]
#[case::empty_json(ManifestFormat::Json, "")]
#[case::unknown_key(ManifestFormat::Toml, "modul = \"record\"")]
#[case::bad_reference(ManifestFormat::Toml, "[once]\nrequires = [\"listeners\"]")]
#[case::unknown_category(ManifestFormat::Toml, "[once]\nrequires = [\"widgets.http\"]")]
fn invalid_manifests_are_rejected(#[case] format: ManifestFormat, #[case] text: &str) {
    let result = format.parse(text);
    assert!(result.is_err(), "expected parse failure for {text:?}");
}

#[test]
fn builder_assembles_manifest() {
    let mut set = Map::new();
    set.insert("ready".into(), json!(true));
    let manifest = ModuleManifest::new("record")
        .with_once(OnceSpec::new().with_set(set.clone()));
    assert_eq!(manifest.once().map(OnceSpec::set), Some(&set));
}
