//! Shared helpers for the API tests

#![allow(dead_code)]
#![allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable

use aodh_client::{Client, ClientConfig};
use serde_json::{json, Value};
use wiremock::{MockServer, Request};

pub const ALARM_ID: &str = "0ef6a2d8-3b61-4a39-9d71-5c6c5b1e2f10";

/// Client pointed at the mock server
pub fn client_for(server: &MockServer) -> Client {
    let config = ClientConfig {
        endpoint: server.uri(),
        ..ClientConfig::default()
    };
    Client::new(&config).unwrap()
}

/// A threshold alarm as the server returns it
pub fn threshold_alarm() -> Value {
    json!({
        "alarm_id": ALARM_ID,
        "name": "cpu-high",
        "type": "threshold",
        "state": "ok",
        "severity": "low",
        "enabled": true,
        "repeat_actions": false,
        "alarm_actions": [],
        "ok_actions": [],
        "insufficient_data_actions": [],
        "time_constraints": [],
        "threshold_rule": {"threshold": 70, "comparison_operator": "gt"}
    })
}

/// All requests the server received with the given method
pub async fn requests_with_method(server: &MockServer, method: &str) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.method.as_str() == method)
        .collect()
}

pub fn body_of(request: &Request) -> Value {
    serde_json::from_slice(&request.body).unwrap()
}
