//! Loading must fail loudly on invalid configuration.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::sync::{Mutex, MutexGuard, PoisonError};

use once_cell::sync::Lazy;
use ortho_config::OrthoConfig;
use tempfile::TempDir;

use homespun_config::Config;
use homespun_discovery::CollisionPolicy;

static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

struct EnvOverride {
    key: &'static str,
    previous: Option<OsString>,
    guard: Option<MutexGuard<'static, ()>>,
}

impl EnvOverride {
    fn set_var(key: &'static str, value: &OsStr) -> Self {
        let guard = ENV_MUTEX.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = std::env::var_os(key);
        unsafe { std::env::set_var(key, value) };
        Self {
            key,
            previous,
            guard: Some(guard),
        }
    }
}

impl Drop for EnvOverride {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(value) => unsafe { std::env::set_var(self.key, value) },
            None => unsafe { std::env::remove_var(self.key) },
        }
        drop(self.guard.take());
    }
}

fn args(extra: &[&OsStr]) -> Vec<OsString> {
    let mut args = vec![OsString::from("homespun")];
    args.extend(extra.iter().map(|arg| arg.to_os_string()));
    args
}

#[test]
fn malformed_config_file_is_rejected() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let path = temp_dir.path().join("homespun.toml");
    fs::write(&path, "root = [unterminated").expect("write malformed config");

    let error = Config::load_from_iter(args(&[OsStr::new("--config-path"), path.as_os_str()]))
        .expect_err("loading must fail");
    assert!(!error.to_string().is_empty());
}

#[test]
fn unknown_collision_policy_is_rejected() {
    let _env = EnvOverride::set_var("HOMESPUN_ON_COLLISION", OsStr::new("first-wins"));
    assert!(Config::load_from_iter(args(&[])).is_err());
}

#[test]
fn environment_selects_collision_policy() {
    let _env = EnvOverride::set_var("HOMESPUN_ON_COLLISION", OsStr::new("reject"));
    let config = Config::load_from_iter(args(&[])).expect("configuration loads");
    assert_eq!(config.on_collision(), CollisionPolicy::Reject);
}
