//! Layering of defaults, configuration files, environment, and flags.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use courier_config::{Config, LogFormat};
use once_cell::sync::Lazy;
use ortho_config::OrthoConfig;
use rstest::rstest;
use tempfile::TempDir;

static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

struct EnvOverride {
    key: &'static str,
    previous: Option<OsString>,
    guard: Option<MutexGuard<'static, ()>>,
}

impl EnvOverride {
    fn set_var(key: &'static str, value: &OsStr) -> Self {
        let guard = ENV_MUTEX
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let previous = std::env::var_os(key);
        // Restored in `Drop`; the mutex serialises tests touching the
        // environment.
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

fn write_config(dir: &Path, contents: &str) -> OsString {
    let path = dir.join("courier.toml");
    fs::write(&path, contents).expect("write configuration file");
    path.into_os_string()
}

fn args(extra: &[&OsStr]) -> Vec<OsString> {
    let mut arguments = vec![OsString::from("courier")];
    arguments.extend(extra.iter().map(|argument| argument.to_os_string()));
    arguments
}

#[rstest]
fn file_values_override_defaults() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let path = write_config(
        temp_dir.path(),
        "log_filter = \"debug\"\nprotocol_path = \"/srv/protocol.json\"\n",
    );

    let config = Config::load_from_iter(args(&[OsStr::new("--config-path"), &path]))
        .expect("configuration loads");

    assert_eq!(config.log_filter(), "debug");
    assert_eq!(
        config.protocol_path().map(|path| path.as_str()),
        Some("/srv/protocol.json")
    );
}

#[rstest]
fn flags_override_file_values() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let path = write_config(temp_dir.path(), "log_filter = \"debug\"\n");

    let config = Config::load_from_iter(args(&[
        OsStr::new("--config-path"),
        &path,
        OsStr::new("--log-filter"),
        OsStr::new("courier_dispatch=trace"),
    ]))
    .expect("configuration loads");

    assert_eq!(config.log_filter(), "courier_dispatch=trace");
}

#[rstest]
fn environment_overrides_defaults() {
    let _env = EnvOverride::set_var("COURIER_LOG_FORMAT", OsStr::new("compact"));

    let config = Config::load_from_iter(args(&[])).expect("configuration loads");

    assert_eq!(config.log_format(), LogFormat::Compact);
}

#[rstest]
fn malformed_file_is_reported() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let path = write_config(temp_dir.path(), "log_filter = [unterminated");

    let error = Config::load_from_iter(args(&[OsStr::new("--config-path"), &path]))
        .expect_err("loading must fail");

    assert!(!error.to_string().is_empty());
}
