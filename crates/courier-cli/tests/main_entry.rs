//! Integration tests for the `courier` binary entry point.

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;
use tempfile::TempDir;

const PROTOCOL: &str = r#"{"domains": [{"domain": "Page", "commands": [{"name": "enable"}]}]}"#;

#[test]
fn lists_domains_from_protocol_flag() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let path = temp_dir.path().join("protocol.json");
    fs::write(&path, PROTOCOL).expect("write protocol");

    let mut command = cargo_bin_cmd!("courier");
    command
        .env_remove("COURIER_CONFIG_PATH")
        .arg("--protocol-path")
        .arg(&path)
        .arg("domains");
    command.assert().success().stdout("Page\n");
}

#[test]
fn missing_command_exits_with_failure() {
    let mut command = cargo_bin_cmd!("courier");
    command.assert().failure();
}

#[test]
fn invalid_request_reports_validation_error() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let path = temp_dir.path().join("protocol.json");
    fs::write(&path, PROTOCOL).expect("write protocol");

    let mut command = cargo_bin_cmd!("courier");
    command
        .arg("--protocol-path")
        .arg(&path)
        .args(["request", "Page.reload"]);
    command
        .assert()
        .failure()
        .stderr(contains("unknown method: Page.reload"));
}
