//! Integration tests for the `imou` CLI binary.
//!
//! Argument parsing, help output, shell completions, and error handling
//! run offline; account commands run against a wiremock cloud.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `imou` binary with env isolation.
///
/// Clears all `IMOU_*` env vars and points config directories at `home`
/// so tests never touch the user's real configuration.
fn imou_cmd_in(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("imou");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_CACHE_HOME", home.join("cache"))
        .env_remove("IMOU_PROFILE")
        .env_remove("IMOU_APP_ID")
        .env_remove("IMOU_APP_SECRET")
        .env_remove("IMOU_DATA_CENTER")
        .env_remove("IMOU_OUTPUT")
        .env_remove("IMOU_INSECURE")
        .env_remove("IMOU_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

fn imou_cmd() -> assert_cmd::Command {
    imou_cmd_in(Path::new("/tmp/imou-cli-test-nonexistent"))
}

/// Command preconfigured with flag credentials pointing at `server`.
fn account_cmd(server_uri: &str, home: &Path) -> assert_cmd::Command {
    let mut cmd = imou_cmd_in(home);
    cmd.args([
        "--app-id",
        "lc_test_app",
        "--app-secret",
        "s3cr3t",
        "--data-center",
        server_uri,
    ]);
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "resp",
        "result": { "code": "0", "msg": "ok", "data": data }
    }))
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/accessToken"))
        .respond_with(ok(json!({ "accessToken": "At_cli" })))
        .mount(server)
        .await;
}

/// Run a blocking command from inside an async test.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = imou_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    imou_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Imou")
            .and(predicate::str::contains("devices"))
            .and(predicate::str::contains("snapshot"))
            .and(predicate::str::contains("callback")),
    );
}

#[test]
fn test_version_flag() {
    imou_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("imou"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    imou_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    imou_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("imou"));
}

// ── Argument errors ─────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    imou_cmd()
        .arg("nonexistent")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_invalid_output_format() {
    imou_cmd()
        .args(["-o", "yaml", "devices", "list"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_snapshot_requires_output_file() {
    imou_cmd()
        .args(["snapshot", "CAM1"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_devices_list_without_config() {
    let output = imou_cmd().args(["devices", "list"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("No configuration found"),
        "Expected config error in output:\n{text}"
    );
}

#[test]
fn test_bad_data_center_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    let output = imou_cmd_in(home.path())
        .args(["--app-id", "a", "--app-secret", "b", "--data-center", "mars", "login"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("data_center"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_no_config() {
    imou_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[defaults]"));
}

#[test]
fn test_config_set_then_show() {
    let home = tempfile::tempdir().unwrap();

    imou_cmd_in(home.path())
        .args(["config", "set", "app_id", "lc_cfg_app"])
        .assert()
        .success();
    imou_cmd_in(home.path())
        .args(["config", "set", "data_center", "fk"])
        .assert()
        .success();

    imou_cmd_in(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("[profiles.default]")
                .and(predicate::str::contains("lc_cfg_app"))
                .and(predicate::str::contains("data_center = \"fk\"")),
        );
}

#[test]
fn test_config_path_points_into_config_home() {
    let home = tempfile::tempdir().unwrap();
    let output = imou_cmd_in(home.path())
        .args(["config", "path"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let printed = String::from_utf8_lossy(&output.stdout);
    assert!(printed.trim_end().ends_with("config.toml"), "got: {printed}");
}

#[test]
fn test_config_path_is_silent_when_quiet() {
    imou_cmd()
        .args(["-q", "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_config_set_unknown_key() {
    let home = tempfile::tempdir().unwrap();
    imou_cmd_in(home.path())
        .args(["config", "set", "color", "blue"])
        .assert()
        .failure()
        .code(2);
}

// ── Account commands against a mock cloud ───────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_login_success() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    let home = tempfile::tempdir().unwrap();

    let output = run({
        let mut cmd = account_cmd(&server.uri(), home.path());
        cmd.arg("login");
        cmd
    })
    .await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stdout).contains("lc_test_app"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_failure_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/accessToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "resp",
            "result": { "code": "OP1009", "msg": "sign error" }
        })))
        .mount(&server)
        .await;
    let home = tempfile::tempdir().unwrap();

    let output = run({
        let mut cmd = account_cmd(&server.uri(), home.path());
        cmd.arg("login");
        cmd
    })
    .await;

    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("OP1009"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_devices_list_json() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/deviceList"))
        .and(body_partial_json(json!({ "params": { "queryRange": "1-100" } })))
        .respond_with(ok(json!({
            "count": 2,
            "devices": [
                { "deviceId": "CAM1", "name": "Porch", "deviceModel": "IPC-A22", "ability": "WLAN" },
                { "deviceId": "CAM2", "name": "Yard", "deviceModel": "IPC-C22EP", "ability": "WLM" }
            ]
        })))
        .mount(&server)
        .await;
    let home = tempfile::tempdir().unwrap();

    let output = run({
        let mut cmd = account_cmd(&server.uri(), home.path());
        cmd.args(["-o", "json", "devices", "list"]);
        cmd
    })
    .await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let devices: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(devices.as_array().map(Vec::len), Some(2));
    assert_eq!(devices[1]["id"], "CAM2");
    assert_eq!(devices[1]["image_identifier"], "IPC-C22EP.png");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_devices_scan_counts_across_runs() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/deviceList"))
        .respond_with(ok(json!({
            "devices": [{ "deviceId": "CAM1", "name": "Porch", "ability": "WLAN" }]
        })))
        .mount(&server)
        .await;
    let home = tempfile::tempdir().unwrap();
    let cache = home.path().join("devices.json");

    let scan = |uri: String, home: std::path::PathBuf, cache: std::path::PathBuf| {
        let mut cmd = account_cmd(&uri, &home);
        cmd.args(["-o", "json-compact", "devices", "scan", "--cache"])
            .arg(cache);
        cmd
    };

    let first = run(scan(server.uri(), home.path().into(), cache.clone())).await;
    assert!(first.status.success(), "{}", combined_output(&first));
    let first: Value = serde_json::from_slice(&first.stdout).unwrap();
    assert_eq!(first["new_count"], 1);
    assert!(cache.exists());

    let second = run(scan(server.uri(), home.path().into(), cache.clone())).await;
    let second: Value = serde_json::from_slice(&second.stdout).unwrap();
    assert_eq!(second["new_count"], 0);
    assert_eq!(second["existing_count"], 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sdcard_abnormal_exit_code() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/deviceSdcardStatus"))
        .respond_with(ok(json!({ "status": "abnormal" })))
        .mount(&server)
        .await;
    let home = tempfile::tempdir().unwrap();

    let output = run({
        let mut cmd = account_cmd(&server.uri(), home.path());
        cmd.args(["sdcard", "CAM1"]);
        cmd
    })
    .await;

    assert_eq!(output.status.code(), Some(5));
    assert!(combined_output(&output).contains("abnormal"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_snapshot_writes_file() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/setDeviceSnapEnhanced"))
        .respond_with(ok(json!({ "url": format!("{}/snap/cam1.jpg", server.uri()) })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/snap/cam1.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF, 0xD8, 0xFF]))
        .mount(&server)
        .await;
    let home = tempfile::tempdir().unwrap();
    let file = home.path().join("cam1.jpg");

    let output = run({
        let mut cmd = account_cmd(&server.uri(), home.path());
        cmd.args(["snapshot", "CAM1", "-O"]).arg(&file);
        cmd
    })
    .await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(std::fs::read(&file).unwrap(), vec![0xFF, 0xD8, 0xFF]);
}
