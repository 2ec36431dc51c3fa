//! Crate-level end-to-end and BDD tests.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use rstest::{fixture, rstest};
use serde_json::json;
use tempfile::TempDir;

use crate::catalog::{ModuleCatalog, ModuleError, ModuleSource};
use crate::category::{Category, HostIdentity};
use crate::discovery::{Discovery, DiscoveryOptions, discover};
use crate::error::{DiscoveryError, InitError};
use crate::loader::ManifestLoader;
use crate::plugin::{Exports, Initializable, Plugin};
use crate::registry::{CollisionPolicy, Registry};


pub(super) fn write_descriptor(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create category dir");
    }
    fs::write(path, contents).expect("write descriptor");
}

#[fixture]
fn plugin_root() -> TempDir {
    let root = TempDir::new().expect("create plugin root");
    write_descriptor(
        root.path(),
        "listeners/listener-foo.toml",
        "[exports]\ngreet = \"hi\"\n",
    );
    write_descriptor(
        root.path(),
        "utilities/utility-bar.toml",
        "[once]\nset = { ready = true }\n",
    );
    root
}

// ---------------------------------------------------------------------------
// Typed modules registered by a host
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Greeter {
    greeting: String,
    exports: Exports,
}

impl Greeter {
    fn greet(&self, who: &str) -> String {
        format!("{}, {who}", self.greeting)
    }
}

impl Plugin for Greeter {
    fn module(&self) -> &str {
        "greeter"
    }

    fn exports(&self) -> &Exports {
        &self.exports
    }
}

fn build_greeter(source: &ModuleSource<'_>) -> Result<Arc<dyn Plugin>, ModuleError> {
    let greeting = source
        .manifest()
        .exports()
        .get("greeting")
        .and_then(|value| value.as_str())
        .ok_or_else(|| ModuleError::new("greeter needs a string 'greeting' export"))?
        .to_owned();
    Ok(Arc::new(Greeter {
        greeting,
        exports: Exports::new(source.manifest().exports().clone()),
    }))
}

static TALLY_CALLS: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug, Default)]
struct Tally {
    exports: Exports,
}

impl Plugin for Tally {
    fn module(&self) -> &str {
        "tally"
    }

    fn exports(&self) -> &Exports {
        &self.exports
    }

    fn initializer(&self) -> Option<&dyn Initializable> {
        Some(self)
    }
}

impl Initializable for Tally {
    fn once(&self, _registry: &Registry) -> Result<(), InitError> {
        TALLY_CALLS.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn build_tally(_: &ModuleSource<'_>) -> Result<Arc<dyn Plugin>, ModuleError> {
    Ok(Arc::new(Tally::default()))
}

fn catalog_with(module: &str, factory: crate::catalog::ModuleFactory) -> ModuleCatalog {
    let mut catalog = ModuleCatalog::builtin();
    catalog.register(module, factory).expect("register module");
    catalog
}

// ---------------------------------------------------------------------------
// End-to-end discovery
// ---------------------------------------------------------------------------

#[rstest]
fn discovers_and_initialises(plugin_root: TempDir) {
    let registry = discover(plugin_root.path(), &DiscoveryOptions::new()).expect("discover");

    let foo = registry
        .get(Category::Listeners, "foo")
        .expect("listener foo registered");
    assert_eq!(foo.exports().get("greet"), Some(json!("hi")));

    let bar = registry
        .get(Category::Utilities, "bar")
        .expect("utility bar registered");
    assert_eq!(bar.exports().get("ready"), Some(json!(true)));

    assert!(registry.category(Category::Observers).is_empty());
    assert!(registry.category(Category::Subscribers).is_empty());
    assert_eq!(registry.categories().count(), 4);
}

#[rstest]
fn self_host_scans_only_utilities(plugin_root: TempDir) {
    let options =
        DiscoveryOptions::new().with_host(HostIdentity::from_package_name("homespun-utilities"));
    let registry = discover(plugin_root.path(), &options).expect("discover");

    assert!(registry.category(Category::Listeners).is_empty());
    assert!(registry.category(Category::Observers).is_empty());
    assert!(registry.get(Category::Utilities, "bar").is_some());
    assert_eq!(
        registry.categories().collect::<Vec<_>>(),
        vec![Category::Utilities]
    );
}

#[rstest]
fn invalid_descriptor_aborts_discovery(plugin_root: TempDir) {
    write_descriptor(
        plugin_root.path(),
        "observers/observer-broken.toml",
        "exports = [",
    );
    let err = discover(plugin_root.path(), &DiscoveryOptions::new())
        .expect_err("invalid file aborts");
    assert!(err.is_load_error(), "unexpected error: {err}");
}

#[rstest]
fn failing_hook_aborts_discovery(plugin_root: TempDir) {
    write_descriptor(
        plugin_root.path(),
        "subscribers/subscriber-upnp.toml",
        "[once]\nrequires = [\"listeners.http\"]\n",
    );
    let err = discover(plugin_root.path(), &DiscoveryOptions::new())
        .expect_err("missing requirement aborts");
    assert!(matches!(
        err,
        DiscoveryError::Init {
            category: Category::Subscribers,
            ref name,
            source: InitError::MissingPlugin { .. },
        } if name == "upnp"
    ));
}

#[rstest]
fn hooks_see_plugins_from_later_categories(plugin_root: TempDir) {
    write_descriptor(
        plugin_root.path(),
        "listeners/listener-http.toml",
        "[once]\nrequires = [\"utilities.bar\"]\ntarget = \"utilities.bar\"\nset = { http = true }\n",
    );
    let registry = discover(plugin_root.path(), &DiscoveryOptions::new()).expect("discover");
    let bar = registry
        .get(Category::Utilities, "bar")
        .expect("utility bar registered");
    assert_eq!(bar.exports().get("http"), Some(json!(true)));
}

#[rstest]
fn reject_policy_surfaces_collisions(plugin_root: TempDir) {
    write_descriptor(plugin_root.path(), "listeners/listener-foo.json", "{}");
    let options = DiscoveryOptions::new().with_collision_policy(CollisionPolicy::Reject);
    let err = discover(plugin_root.path(), &options).expect_err("collision rejected");
    assert!(matches!(err, DiscoveryError::NameCollision { .. }));
}

#[test]
fn missing_root_yields_empty_registry() {
    let dir = TempDir::new().expect("create temp dir");
    let registry = discover(&dir.path().join("nowhere"), &DiscoveryOptions::new())
        .expect("missing root is empty");
    assert!(registry.is_empty());
}

#[rstest]
fn custom_module_is_reachable_as_its_type(plugin_root: TempDir) {
    write_descriptor(
        plugin_root.path(),
        "utilities/utility-hello.toml",
        "module = \"greeter\"\n\n[exports]\ngreeting = \"hello\"\n",
    );
    let loader = ManifestLoader::new(catalog_with("greeter", build_greeter));
    let registry = Discovery::new(loader, DiscoveryOptions::new())
        .run(plugin_root.path())
        .expect("discover");

    let plugin = registry
        .get(Category::Utilities, "hello")
        .expect("greeter registered");
    let greeter = plugin
        .downcast_ref::<Greeter>()
        .expect("plugin is a greeter");
    assert_eq!(greeter.greet("world"), "hello, world");
}

#[cfg(unix)]
#[test]
fn symlinked_module_initialises_once() {
    let root = TempDir::new().expect("create plugin root");
    write_descriptor(root.path(), "utilities/utility-tally.toml", "module = \"tally\"\n");
    let utilities = root.path().join("utilities");
    std::os::unix::fs::symlink(
        utilities.join("utility-tally.toml"),
        utilities.join("utility-counter.toml"),
    )
    .expect("create symlink");

    let loader = ManifestLoader::new(catalog_with("tally", build_tally));
    let registry = Discovery::new(loader, DiscoveryOptions::new())
        .run(root.path())
        .expect("discover");

    let first = registry
        .get(Category::Utilities, "counter")
        .expect("alias registered");
    let second = registry
        .get(Category::Utilities, "tally")
        .expect("original registered");
    assert!(Arc::ptr_eq(first, second));
    assert_eq!(TALLY_CALLS.load(Ordering::SeqCst), 1);
}
