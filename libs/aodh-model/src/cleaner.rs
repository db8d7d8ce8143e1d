//! Alarm rule cleaner
//!
//! An alarm payload may only carry the rule matching its `type`. The cleaner
//! strips every other known `<type>_rule` key and leaves all other fields
//! alone. The type is taken as a plain string so alarms of types this crate
//! does not model are cleaned too.

use serde_json::{Map, Value};
use tracing::debug;

use crate::types::AlarmType;

/// Remove every known rule key that belongs to a type other than `alarm_type`
///
/// The matching `<alarm_type>_rule` key (if present) and all non-rule fields
/// are left untouched. For a type outside [`AlarmType::ALL`] every known rule
/// key is removed.
///
/// # Examples
/// ```
/// use aodh_model::{clean_rules, AlarmType};
/// use serde_json::json;
///
/// let mut alarm = json!({
///     "type": "threshold",
///     "threshold_rule": {"threshold": 1},
///     "event_rule": {"event_type": "*"},
/// });
/// clean_rules(AlarmType::Threshold.as_str(), alarm.as_object_mut().unwrap());
/// assert!(alarm.get("event_rule").is_none());
/// assert!(alarm.get("threshold_rule").is_some());
/// ```
pub fn clean_rules(alarm_type: &str, alarm: &mut Map<String, Value>) {
    for other in AlarmType::ALL.into_iter().filter(|t| t.as_str() != alarm_type) {
        if alarm.remove(other.rule_key()).is_some() {
            debug!("Dropped {} from {} alarm", other.rule_key(), alarm_type);
        }
    }
}

/// Rule keys present in `alarm`, in [`AlarmType::ALL`] order
pub fn rule_keys(alarm: &Map<String, Value>) -> Vec<&'static str> {
    AlarmType::ALL
        .into_iter()
        .map(|t| t.rule_key())
        .filter(|key| alarm.contains_key(*key))
        .collect()
}
