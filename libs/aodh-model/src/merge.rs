//! Alarm update merge
//!
//! The Aodh API expects a complete alarm on PUT, so an update fragment is
//! merged into the alarm fetched from the server before it is sent back.
//! Rule merging is driven by [`RULE_MERGE_ORDER`]: the first rule key found
//! in the fragment is merged with its strategy and consumed.

use errors::{AodhError, AodhResult};
use serde_json::{Map, Value};
use tracing::debug;

use crate::cleaner::{clean_rules, rule_keys};
use crate::types::AlarmType;

/// How a rule from an update fragment is applied to the existing alarm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Fragment fields overwrite same-named fields of the existing rule
    Shallow,
    /// A truthy fragment rule replaces the existing rule wholesale;
    /// a falsy one is dropped
    ReplaceIfTruthy,
}

/// Rule merge priority. The first entry whose key is present wins.
pub const RULE_MERGE_ORDER: [(AlarmType, MergeStrategy); 6] = [
    (AlarmType::Threshold, MergeStrategy::Shallow),
    (AlarmType::Event, MergeStrategy::Shallow),
    (AlarmType::GnocchiResourcesThreshold, MergeStrategy::Shallow),
    (
        AlarmType::GnocchiAggregationByMetricsThreshold,
        MergeStrategy::Shallow,
    ),
    (
        AlarmType::GnocchiAggregationByResourcesThreshold,
        MergeStrategy::Shallow,
    ),
    (AlarmType::Composite, MergeStrategy::ReplaceIfTruthy),
];

/// JSON truthiness: null, false, 0, "", [] and {} are falsy
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Overwrite same-named fields of `target` with those of `source`
pub fn shallow_merge(target: &mut Map<String, Value>, source: Map<String, Value>) {
    for (key, value) in source {
        target.insert(key, value);
    }
}

/// Raw `type` field of an alarm payload, known to this crate or not
pub fn type_name_of(alarm: &Map<String, Value>) -> AodhResult<&str> {
    match alarm.get("type") {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(AodhError::Deserialization(format!(
            "alarm type must be a string, got {}",
            other
        ))),
        None => Err(AodhError::Deserialization(
            "alarm payload has no type".to_string(),
        )),
    }
}

/// `type` field of an alarm payload parsed into [`AlarmType`]
pub fn alarm_type_of(alarm: &Map<String, Value>) -> AodhResult<AlarmType> {
    type_name_of(alarm)?.parse().map_err(AodhError::Validation)
}

/// Merge an update fragment into a complete alarm payload
///
/// 1. Rule keys foreign to the *existing* alarm's type are removed from the
///    fragment, so at most one rule key is left to merge. An alarm type
///    this crate does not model keeps none of the known rule keys.
/// 2. The first rule key of [`RULE_MERGE_ORDER`] present in the fragment is
///    applied with its strategy and removed from the fragment.
/// 3. The remaining top-level fields overwrite those of the alarm.
///
/// Returns the type whose rule was merged, if any.
pub fn merge_alarm_update(
    alarm: &mut Map<String, Value>,
    mut update: Map<String, Value>,
) -> AodhResult<Option<AlarmType>> {
    let existing_type = type_name_of(alarm)?.to_string();
    clean_rules(&existing_type, &mut update);

    let mut merged = None;
    for (alarm_type, strategy) in RULE_MERGE_ORDER {
        let key = alarm_type.rule_key();
        let Some(fragment) = update.remove(key) else {
            continue;
        };

        match strategy {
            MergeStrategy::Shallow => {
                let Value::Object(fields) = fragment else {
                    return Err(AodhError::invalid_parameter(
                        key,
                        "rule update must be a JSON object",
                    ));
                };
                match alarm.get_mut(key) {
                    Some(Value::Object(existing)) => shallow_merge(existing, fields),
                    _ => {
                        alarm.insert(key.to_string(), Value::Object(fields));
                    },
                }
            },
            MergeStrategy::ReplaceIfTruthy => {
                if is_truthy(&fragment) {
                    alarm.insert(key.to_string(), fragment);
                } else {
                    debug!("Ignoring empty {} in alarm update", key);
                }
            },
        }

        merged = Some(alarm_type);
        break;
    }

    debug_assert!(rule_keys(&update).is_empty());
    shallow_merge(alarm, update);
    Ok(merged)
}
