//! Integration tests for the `panos-actions` binary.
//!
//! Argument parsing, offline commands and error exits run without an
//! appliance; the action tests drive a wiremock XML API.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the binary with env isolation.
///
/// Clears all `PANOS_*` env vars and points config directories at a
/// nonexistent path so tests never touch a real configuration.
fn panos_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("panos-actions");
    cmd.env("HOME", "/tmp/panos-actions-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/panos-actions-test-nonexistent")
        .env_remove("RUST_LOG");
    for var in [
        "PANOS_PROFILE",
        "PANOS_HOSTNAME",
        "PANOS_API_KEY",
        "PANOS_USERNAME",
        "PANOS_PASSWORD",
        "PANOS_OUTPUT",
        "PANOS_INSECURE",
        "PANOS_TIMEOUT",
        "PANOS_POLL_INTERVAL",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = panos_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_lists_actions() {
    panos_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("commit")
            .and(predicate::str::contains("push"))
            .and(predicate::str::contains("vm-auth-key"))
            .and(predicate::str::contains("import-id")),
    );
}

#[test]
fn test_version_flag() {
    panos_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("panos-actions"));
}

#[test]
fn test_completions_zsh() {
    panos_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_commit_without_appliance() {
    panos_cmd()
        .arg("commit")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No appliance configured"));
}

#[test]
fn test_unknown_profile() {
    panos_cmd()
        .args(["--profile", "prod", "system-info"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("prod"));
}

#[test]
fn test_hostname_without_credentials() {
    panos_cmd()
        .args(["--hostname", "fw.example.com", "system-info"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("No credentials"));
}

#[test]
fn test_invalid_output_format() {
    let output = panos_cmd()
        .args(["--output", "xml", "system-info"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("possible values"));
}

// ── Offline commands ────────────────────────────────────────────────

#[test]
fn test_import_id_round_trip() {
    let output = panos_cmd()
        .args(["-o", "json", "import-id", "generate", "panos_address"])
        .write_stdin(r#"{"location": {"shared": {}}, "name": "web-01", "value": "10.0.0.1"}"#)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    let id = stdout_json(&output)["import_id"].as_str().unwrap().to_owned();

    let output = panos_cmd()
        .args(["-o", "json", "import-id", "decode", &id])
        .output()
        .unwrap();
    assert!(output.status.success());
    let decoded = stdout_json(&output);
    assert_eq!(decoded["name"], "web-01");
    assert!(decoded.get("value").is_none());
}

#[test]
fn test_import_id_unknown_resource() {
    panos_cmd()
        .args(["import-id", "generate", "panos_unicorn"])
        .write_stdin("{}")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("panos_unicorn"));
}

#[test]
fn test_import_id_resources() {
    panos_cmd()
        .args(["import-id", "resources"])
        .assert()
        .success()
        .stdout(predicate::str::contains("panos_security_policy_rules"));
}

#[test]
fn test_position_directly_before() {
    let output = panos_cmd()
        .args(["-o", "json", "position"])
        .write_stdin(r#"{"where": "before", "pivot": "rule-x", "directly": true}"#)
        .output()
        .unwrap();
    assert!(output.status.success());
    let view = stdout_json(&output);
    assert_eq!(view["resolved"]["where"], "before");
    assert_eq!(view["resolved"]["dst"], "rule-x");
    assert_eq!(view["resolved"]["directly"], true);
    assert_eq!(view["diagnostics"], serde_json::json!([]));
}

#[test]
fn test_position_ignored_fields_warn() {
    panos_cmd()
        .arg("position")
        .write_stdin(r#"{"where": "first", "pivot": "r1", "directly": true}"#)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("pivot ignored").and(predicate::str::contains("directly ignored")),
        );
}

#[test]
fn test_position_missing_pivot_fails() {
    panos_cmd()
        .arg("position")
        .write_stdin(r#"{"where": "after", "directly": false}"#)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("position.pivot"));
}

#[test]
fn test_position_satisfaction_check() {
    let output = panos_cmd()
        .args(["-o", "json", "position", "--order", "a,r1,r2,b", "--rules", "r1,r2"])
        .write_stdin(r#"{"where": "after", "pivot": "a", "directly": true}"#)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["satisfied"], true);
}

// ── Actions against a mock appliance ────────────────────────────────

fn xml(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "application/xml")
        .set_body_string(body)
}

async fn mock_firewall() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/"))
        .and(header("X-PAN-KEY", "KEY123"))
        .and(body_string_contains("info"))
        .respond_with(xml(
            "<response status=\"success\"><result><system>\
             <hostname>fw01</hostname><model>PA-VM</model>\
             </system></result></response>",
        ))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/"))
        .and(body_string_contains("type=commit"))
        .respond_with(xml(
            "<response status=\"success\" code=\"19\"><result>\
             <msg><line>Commit job enqueued with jobid 42</line></msg>\
             <job>42</job></result></response>",
        ))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/"))
        .and(body_string_contains("jobs"))
        .respond_with(xml(
            "<response status=\"success\"><result><job>\
             <id>42</id><type>Commit</type><status>FIN</status><result>OK</result>\
             <progress>100</progress></job></result></response>",
        ))
        .mount(&server)
        .await;

    server
}

/// Run the binary off the async runtime so wiremock keeps serving.
async fn run_against(server: &MockServer, args: &[&str], stdin: &str) -> std::process::Output {
    let mut cmd = panos_cmd();
    cmd.args(["--hostname", &server.uri(), "--api-key", "KEY123", "--poll-interval", "1"])
        .args(args)
        .write_stdin(stdin.to_owned());
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_firewall_commit() {
    let server = mock_firewall().await;
    let output = run_against(&server, &["-o", "json", "commit", "-f", "-"], "{}").await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let report = stdout_json(&output);
    assert_eq!(report["commit_job"], 42);
    assert_eq!(report["diagnostics"], serde_json::json!([]));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_firewall_rejects_manager_scopes() {
    let server = mock_firewall().await;
    let output = run_against(
        &server,
        &["commit", "-f", "-"],
        r#"{"templates": ["t1"]}"#,
    )
    .await;

    assert_eq!(output.status.code(), Some(1), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Invalid parameters for firewall"));
    let commits = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| String::from_utf8_lossy(&r.body).contains("type=commit"))
        .count();
    assert_eq!(commits, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_system_info() {
    let server = mock_firewall().await;
    let output = run_against(&server, &["-o", "json", "system-info"], "").await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let info = stdout_json(&output);
    assert_eq!(info["role"], "firewall");
    assert_eq!(info["hostname"], "fw01");
}
