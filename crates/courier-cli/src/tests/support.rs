//! Shared harness for CLI unit and behaviour tests.

use std::ffi::OsString;
use std::fs;
use std::process::ExitCode;

use courier_config::Config;
use rstest::fixture;
use tempfile::TempDir;

use crate::{AppError, ConfigLoader, IoStreams, run_with_loader};

/// Protocol written to disk for CLI runs.
pub(super) const PAGE_PROTOCOL: &str = r#"{
    "domains": [
        {
            "domain": "Page",
            "commands": [
                {"name": "enable"},
                {
                    "name": "navigate",
                    "parameters": [
                        {"name": "url", "type": "string"},
                        {"name": "referrer", "type": "string", "optional": true}
                    ]
                }
            ],
            "events": [{"name": "loaded"}, {"name": "frameNavigated"}]
        },
        {"domain": "Network", "commands": [{"name": "enable"}]}
    ]
}"#;

/// A config loader that returns a fixed configuration.
pub(super) struct StaticConfigLoader {
    config: Config,
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(self.config.clone())
    }
}

/// CLI state and captured output.
#[derive(Default)]
pub(super) struct TestWorld {
    pub(super) config: Config,
    pub(super) temp_dir: Option<TempDir>,
    pub(super) stdout: Vec<u8>,
    pub(super) stderr: Vec<u8>,
    pub(super) exit_code: Option<ExitCode>,
}

impl TestWorld {
    /// Writes `contents` as the protocol file and points the config at it.
    pub(super) fn install_protocol(&mut self, contents: &str) {
        let temp_dir = TempDir::new().expect("create temp dir");
        let path = temp_dir.path().join("protocol.json");
        fs::write(&path, contents).expect("write protocol file");
        let utf8 = path.to_str().expect("temp path is UTF-8").to_owned();
        self.config = self.config.clone().with_protocol_path(utf8);
        self.temp_dir = Some(temp_dir);
    }

    /// Runs the CLI with `courier` followed by the whitespace-split `command`.
    pub(super) fn run(&mut self, command: &str) {
        let args = std::iter::once("courier")
            .chain(command.split_whitespace())
            .map(OsString::from)
            .collect::<Vec<_>>();
        self.run_args(args);
    }

    /// Runs the CLI with explicit arguments, program name included.
    pub(super) fn run_args(&mut self, args: Vec<OsString>) {
        self.stdout.clear();
        self.stderr.clear();
        let loader = StaticConfigLoader {
            config: self.config.clone(),
        };
        let mut io = IoStreams::new(&mut self.stdout, &mut self.stderr);
        self.exit_code = Some(run_with_loader(args, &mut io, &loader));
    }

    pub(super) fn stdout_text(&self) -> String {
        String::from_utf8(self.stdout.clone()).expect("stdout is UTF-8")
    }

    pub(super) fn stderr_text(&self) -> String {
        String::from_utf8(self.stderr.clone()).expect("stderr is UTF-8")
    }

    pub(super) fn succeeded(&self) -> bool {
        self.exit_code == Some(ExitCode::SUCCESS)
    }
}

/// World with the page protocol installed.
#[fixture]
pub(super) fn world() -> TestWorld {
    let mut world = TestWorld::default();
    world.install_protocol(PAGE_PROTOCOL);
    world
}
