//! End-to-end tests of the aodh binary

#![allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable

use assert_cmd::prelude::*;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::process::Output;
use wiremock::matchers::{body_json, body_string, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ALARM_ID: &str = "0ef6a2d8-3b61-4a39-9d71-5c6c5b1e2f10";

/// Nothing listens on the discard port
const DEAD_ENDPOINT: &str = "http://127.0.0.1:9";

fn aodh() -> Command {
    let mut cmd = Command::cargo_bin("aodh").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("AODH_ENDPOINT")
        .env_remove("AODH_AUTH_TOKEN")
        .arg("--no-color");
    cmd
}

/// Run the binary off the runtime so the mock server keeps serving
async fn run(args: Vec<String>) -> Output {
    tokio::task::spawn_blocking(move || aodh().args(args).output().unwrap())
        .await
        .unwrap()
}

fn args(endpoint: &str, rest: &[&str]) -> Vec<String> {
    let mut args = vec!["--endpoint".to_string(), endpoint.to_string()];
    args.extend(rest.iter().map(|s| s.to_string()));
    args
}

#[test]
fn test_help_lists_commands() {
    aodh()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("alarm"))
        .stdout(predicate::str::contains("alarm-history"))
        .stdout(predicate::str::contains("capabilities"));
}

#[test]
fn test_history_show_requires_alarm_id() {
    aodh()
        .args(["alarm-history", "show"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_create_without_meter_fails_before_any_request() {
    aodh()
        .args([
            "--endpoint",
            DEAD_ENDPOINT,
            "alarm",
            "create",
            "--type",
            "threshold",
            "--name",
            "cpu-high",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("meter-name"));
}

#[test]
fn test_invalid_state_is_rejected_by_parser() {
    aodh()
        .args(["alarm", "state", "set", ALARM_ID, "--state", "broken"])
        .assert()
        .code(2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_history_show_prints_columns() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/v2/alarms/{}/history", ALARM_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "alarm_id": ALARM_ID,
            "timestamp": "2026-10-01T12:00:00",
            "type": "creation",
            "detail": "{\"state\": \"insufficient data\"}",
            "event_id": "e-1"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let output = run(args(&server.uri(), &["alarm-history", "show", ALARM_ID])).await;
    output
        .assert()
        .success()
        .stdout(predicate::str::contains("timestamp"))
        .stdout(predicate::str::contains("creation"))
        .stdout(predicate::str::contains("event_id").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_history_search_prints_columns() {
    let query = r#"{"=": {"type": "deletion"}}"#;
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/query/alarms/history"))
        .and(query_param("limit", "2"))
        .and(body_json(json!({"filter": query})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "alarm_id": ALARM_ID,
            "timestamp": "2026-10-02T08:30:00",
            "type": "deletion",
            "detail": "{\"name\": \"cpu-high\"}",
            "on_behalf_of": "p-1"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let output = run(args(
        &server.uri(),
        &["-f", "json", "alarm-history", "search", "--query", query, "--limit", "2"],
    ))
    .await;
    assert!(output.status.success());
    let rows: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        rows,
        json!([{
            "alarm_id": ALARM_ID,
            "timestamp": "2026-10-02T08:30:00",
            "type": "deletion",
            "detail": "{\"name\": \"cpu-high\"}"
        }])
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_json_output_keeps_list_columns() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/alarms"))
        .and(query_param("q.field", "type"))
        .and(query_param("q.value", "event"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "alarm_id": ALARM_ID,
            "type": "event",
            "name": "instance-down",
            "state": "ok",
            "severity": "moderate",
            "enabled": true,
            "event_rule": {"event_type": "compute.instance.delete"}
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let output = run(args(
        &server.uri(),
        &["-f", "json", "alarm", "list", "--filter", "type=event"],
    ))
    .await;
    assert!(output.status.success());
    let rows: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        rows,
        json!([{
            "alarm_id": ALARM_ID,
            "type": "event",
            "name": "instance-down",
            "state": "ok",
            "severity": "moderate",
            "enabled": true
        }])
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_deprecated_list_query_warns_and_queries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/query/alarms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let output = run(args(
        &server.uri(),
        &["alarm", "list", "--query", r#"{"=": {"type": "threshold"}}"#],
    ))
    .await;
    output
        .assert()
        .success()
        .stderr(predicate::str::contains("deprecated"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_state_set_sends_quoted_state() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("/v2/alarms/{}/state", ALARM_ID)))
        .and(body_string("\"alarm\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("alarm")))
        .expect(1)
        .mount(&server)
        .await;

    let output = run(args(
        &server.uri(),
        &["alarm", "state", "set", ALARM_ID, "--state", "alarm"],
    ))
    .await;
    output
        .assert()
        .success()
        .stdout(predicate::str::contains("alarm"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_not_found_exits_with_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/v2/alarms/{}", ALARM_ID)))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error_message": {"faultstring": "Alarm not found"}
        })))
        .mount(&server)
        .await;

    let output = run(args(&server.uri(), &["alarm", "show", ALARM_ID])).await;
    output
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}
