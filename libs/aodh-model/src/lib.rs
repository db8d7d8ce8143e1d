//! Aodh Model Library
//!
//! Alarm types, rule shapes and the payload rules the Aodh API enforces.
//! This library does no I/O; the HTTP side lives in `aodh-client`.

#![allow(clippy::disallowed_methods)] // json! macro internally uses unwrap

//! # Modules
//!
//! - `types`: alarm type, state, severity and comparison operator enums
//! - `query`: `{field, op, value, type}` query items used inside rules
//! - `rule`: one rule shape per alarm type and the [`AlarmRule`] union
//! - `alarm`: typed [`Alarm`] with a flat wire representation
//! - `cleaner`: removal of rule keys that do not match an alarm's type
//! - `merge`: merging an update fragment into a fetched alarm
//! - `history`: alarm history rows
//!
//! # Example
//!
//! ```
//! use aodh_model::merge_alarm_update;
//! use serde_json::json;
//!
//! let mut alarm = json!({
//!     "type": "threshold",
//!     "threshold_rule": {"threshold": 70, "comparison_operator": "gt"}
//! });
//! let update = json!({"threshold_rule": {"threshold": 80}, "event_rule": {}});
//!
//! merge_alarm_update(
//!     alarm.as_object_mut().unwrap(),
//!     update.as_object().unwrap().clone(),
//! )
//! .unwrap();
//! assert_eq!(
//!     alarm,
//!     json!({
//!         "type": "threshold",
//!         "threshold_rule": {"threshold": 80, "comparison_operator": "gt"}
//!     })
//! );
//! ```

pub mod alarm;
pub mod cleaner;
pub mod history;
pub mod merge;
pub mod query;
pub mod rule;
pub mod types;

// Re-exports for convenience
pub use alarm::{Alarm, AlarmAttributes, TimeConstraint};
pub use cleaner::{clean_rules, rule_keys};
pub use history::AlarmHistoryEntry;
pub use merge::{
    alarm_type_of, is_truthy, merge_alarm_update, shallow_merge, type_name_of, MergeStrategy,
    RULE_MERGE_ORDER,
};
pub use query::QueryItem;
pub use rule::{
    AlarmRule, CompositeRule, EventRule, GnocchiAggregationByMetricsThresholdRule,
    GnocchiAggregationByResourcesThresholdRule, GnocchiResourcesThresholdRule, ThresholdRule,
};
pub use types::{AlarmState, AlarmType, ComparisonOperator, Severity};
