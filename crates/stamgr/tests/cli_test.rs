//! Integration tests for the `stamgr` CLI binary.
//!
//! Argument parsing, help output and error handling run without a
//! controller; the end-to-end cases drive the binary against wiremock.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

const STAMGR_VARS: &[&str] = &[
    "STAMGR_PROFILE",
    "STAMGR_HOST",
    "STAMGR_PORT",
    "STAMGR_BASE_URL",
    "STAMGR_SITE",
    "STAMGR_USERNAME",
    "STAMGR_PASSWORD",
    "STAMGR_API_VERSION",
    "STAMGR_OUTPUT",
    "STAMGR_INSECURE",
    "STAMGR_TIMEOUT",
    "RUST_LOG",
];

/// Build a command for the `stamgr` binary with env isolation.
///
/// Clears all `STAMGR_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn stamgr_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("stamgr");
    cmd.env("HOME", "/tmp/stamgr-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/stamgr-test-nonexistent");
    for var in STAMGR_VARS {
        cmd.env_remove(var);
    }
    cmd
}

/// A command pointed at the mock controller with working credentials.
fn controller_cmd(server: &MockServer) -> assert_cmd::Command {
    let mut cmd = stamgr_cmd();
    cmd.env("STAMGR_PASSWORD", "p4ssw0rd").args([
        "--host",
        "127.0.0.1",
        "--base-url",
        &server.uri(),
        "-u",
        "admin",
    ]);
    cmd
}

/// Run a blocking command without starving the mock server's runtime.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output())
        .await
        .unwrap()
        .unwrap()
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

async fn mount_session(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_json(json!({ "username": "admin", "password": "p4ssw0rd" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "meta": { "rc": "ok" } })))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/logout"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/manage"))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_stamgr(server: &MockServer, body: Value) {
    Mock::given(method("POST"))
        .and(path("/api/s/default/cmd/stamgr"))
        .and(body_json(body))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "meta": { "rc": "ok" }, "data": [] })),
        )
        .expect(1)
        .mount(server)
        .await;
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = stamgr_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    stamgr_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("UniFi")
            .and(predicate::str::contains("clients"))
            .and(predicate::str::contains("devices")),
    );
}

#[test]
fn test_version_flag() {
    stamgr_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("stamgr"));
}

#[test]
fn test_clients_help_lists_station_commands() {
    stamgr_cmd().args(["clients", "--help"]).assert().success().stdout(
        predicate::str::contains("authorize")
            .and(predicate::str::contains("unauthorize"))
            .and(predicate::str::contains("kick"))
            .and(predicate::str::contains("block"))
            .and(predicate::str::contains("unblock")),
    );
}

#[test]
fn test_authorize_requires_minutes() {
    stamgr_cmd()
        .args(["clients", "authorize", "00:11:22:33:44:55"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--minutes"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    stamgr_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stamgr"));
}

#[test]
fn test_completions_invalid_shell() {
    stamgr_cmd().args(["completions", "tcsh"]).assert().failure();
}

// ── Configuration ───────────────────────────────────────────────────

#[test]
fn test_config_path_uses_config_home() {
    stamgr_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_masks_password() {
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join("stamgr");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "default_profile = \"home\"\n\n[profiles.home]\nhost = \"10.0.0.2\"\nusername = \"admin\"\npassword = \"hunter2\"\n",
    )
    .unwrap();

    stamgr_cmd()
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("10.0.0.2")
                .and(predicate::str::contains("hunter2").not()),
        );
}

#[test]
fn test_no_controller_configured() {
    let output = stamgr_cmd().args(["clients", "list"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("No controller configured"),
        "Expected config hint in output:\n{text}"
    );
}

#[test]
fn test_missing_password_is_auth_error() {
    // No STAMGR_PASSWORD, no keyring entry, no profile password
    let output = stamgr_cmd()
        .args(["--host", "127.0.0.1", "-u", "admin", "clients", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
}

// ── End to end ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_clients_list_json() {
    let server = MockServer::start().await;
    mount_session(&server).await;
    let clients = json!([
        { "mac": "00:11:22:33:44:55", "hostname": "laptop", "is_guest": true },
        { "mac": "66:77:88:99:aa:bb", "name": "printer" }
    ]);
    Mock::given(method("GET"))
        .and(path("/api/s/default/stat/sta"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "meta": { "rc": "ok" }, "data": clients })),
        )
        .mount(&server)
        .await;

    let mut cmd = controller_cmd(&server);
    cmd.args(["-o", "json-compact", "clients", "list"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let parsed: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed, clients);
}

#[tokio::test]
async fn test_clients_list_plain_prints_macs() {
    let server = MockServer::start().await;
    mount_session(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/s/default/stat/sta"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "rc": "ok" },
            "data": [{ "mac": "00:11:22:33:44:55" }, { "mac": "66:77:88:99:aa:bb" }]
        })))
        .mount(&server)
        .await;

    let mut cmd = controller_cmd(&server);
    cmd.args(["-o", "plain", "clients", "list"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "00:11:22:33:44:55\n66:77:88:99:aa:bb\n"
    );
}

#[tokio::test]
async fn test_login_rejected_exits_with_auth_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "meta": { "rc": "error", "msg": "api.err.Invalid" },
            "data": []
        })))
        .mount(&server)
        .await;

    let output = run({
        let mut cmd = controller_cmd(&server);
        cmd.args(["clients", "list"]);
        cmd
    })
    .await;

    assert_eq!(output.status.code(), Some(3));
    let text = combined_output(&output);
    assert!(text.contains("api.err.Invalid"), "output:\n{text}");
}

#[tokio::test]
async fn test_authorize_sends_only_set_fields() {
    let server = MockServer::start().await;
    mount_session(&server).await;
    mount_stamgr(
        &server,
        json!({
            "cmd": "authorize-guest",
            "mac": "00:11:22:33:44:55",
            "minutes": 60,
            "down": 2048
        }),
    )
    .await;

    let mut cmd = controller_cmd(&server);
    cmd.args([
        "clients",
        "authorize",
        "00:11:22:33:44:55",
        "--minutes",
        "60",
        "--down",
        "2048",
    ]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("authorized for 60 minutes"));
}

#[tokio::test]
async fn test_block_with_yes_flag() {
    let server = MockServer::start().await;
    mount_session(&server).await;
    mount_stamgr(
        &server,
        json!({ "cmd": "block-sta", "mac": "00:11:22:33:44:55" }),
    )
    .await;

    let mut cmd = controller_cmd(&server);
    cmd.args(["-y", "clients", "block", "00:11:22:33:44:55"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
}

#[tokio::test]
async fn test_dash_form_mac_is_sent_in_colon_form() {
    let server = MockServer::start().await;
    mount_session(&server).await;
    mount_stamgr(
        &server,
        json!({ "cmd": "block-sta", "mac": "00:1a:2b:3c:4d:5e" }),
    )
    .await;

    let mut cmd = controller_cmd(&server);
    cmd.args(["-y", "clients", "block", "00-1A-2B-3C-4D-5E"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("Client 00:1a:2b:3c:4d:5e blocked"),
        "{}",
        combined_output(&output)
    );
}

#[tokio::test]
async fn test_rejected_command_still_logs_out() {
    let server = MockServer::start().await;
    mount_session(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/s/default/cmd/stamgr"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "rc": "error", "msg": "api.err.UnknownStation" }
        })))
        .mount(&server)
        .await;

    let mut cmd = controller_cmd(&server);
    cmd.args(["clients", "kick", "00:11:22:33:44:55"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("api.err.UnknownStation"));
    // logout `.expect(1)` is verified when `server` drops
}

#[tokio::test]
async fn test_invalid_mac_is_usage_error() {
    let server = MockServer::start().await;
    mount_session(&server).await;

    let mut cmd = controller_cmd(&server);
    cmd.args(["clients", "kick", "not-a-mac"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(2));
}

#[tokio::test]
async fn test_devices_list_uses_site_flag() {
    let server = MockServer::start().await;
    mount_session(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/s/branch01/stat/device"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "rc": "ok" },
            "data": [{ "mac": "f0:9f:c2:00:00:01", "model": "U7PG2", "state": 1 }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = controller_cmd(&server);
    cmd.args(["--site", "branch01", "devices", "list"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("U7PG2") && stdout.contains("connected"), "{stdout}");
}
