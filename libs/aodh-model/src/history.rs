//! Alarm history entries

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::Severity;

/// One row of an alarm's change log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlarmHistoryEntry {
    pub alarm_id: String,
    #[serde(default)]
    pub timestamp: String,
    /// `creation`, `rule change`, `state transition` or `deletion`
    #[serde(rename = "type", default)]
    pub change_type: String,
    /// JSON-encoded description of the change
    #[serde(default)]
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_behalf_of: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AlarmHistoryEntry {
    /// Decoded `detail`, when it holds JSON
    pub fn detail_json(&self) -> Option<Value> {
        serde_json::from_str(&self.detail).ok()
    }
}
