//! Rule shapes, one per alarm type
//!
//! Every rule struct keeps unknown fields in `extra` so that payloads from
//! newer servers survive a round trip through the typed model.

use errors::AodhResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::query::QueryItem;
use crate::types::{AlarmType, ComparisonOperator};

/// Rule of a `threshold` alarm (legacy ceilometer meters)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meter_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison_operator: Option<ComparisonOperator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation_periods: Option<u32>,
    /// Length of each evaluation period in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<u32>,
    /// Statistic to compare (max, min, avg, sum, count)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistic: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub query: Vec<QueryItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_outliers: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Rule of an `event` alarm
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventRule {
    /// Event type to match, `*` for any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub query: Vec<QueryItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Rule of a `composite` alarm
///
/// An `and`/`or` tree of sub-rules, e.g.
/// `{"or": [{"type": "threshold", ...}, {"and": [...]}]}`. The tree is kept
/// as JSON and always replaced as a whole on update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompositeRule(pub Value);

/// Rule of a `gnocchi_resources_threshold` alarm
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GnocchiResourcesThresholdRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub granularity: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison_operator: Option<ComparisonOperator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation_periods: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Rule of a `gnocchi_aggregation_by_metrics_threshold` alarm
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GnocchiAggregationByMetricsThresholdRule {
    /// Metric ids to aggregate across
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metrics: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub granularity: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison_operator: Option<ComparisonOperator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation_periods: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Rule of a `gnocchi_aggregation_by_resources_threshold` alarm
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GnocchiAggregationByResourcesThresholdRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
    /// Gnocchi resource search expression, as a JSON string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub granularity: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison_operator: Option<ComparisonOperator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation_periods: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The one rule an alarm carries, tagged by alarm type
#[derive(Debug, Clone, PartialEq)]
pub enum AlarmRule {
    Threshold(ThresholdRule),
    Event(EventRule),
    Composite(CompositeRule),
    GnocchiResourcesThreshold(GnocchiResourcesThresholdRule),
    GnocchiAggregationByMetricsThreshold(GnocchiAggregationByMetricsThresholdRule),
    GnocchiAggregationByResourcesThreshold(GnocchiAggregationByResourcesThresholdRule),
}

impl AlarmRule {
    pub fn alarm_type(&self) -> AlarmType {
        match self {
            Self::Threshold(_) => AlarmType::Threshold,
            Self::Event(_) => AlarmType::Event,
            Self::Composite(_) => AlarmType::Composite,
            Self::GnocchiResourcesThreshold(_) => AlarmType::GnocchiResourcesThreshold,
            Self::GnocchiAggregationByMetricsThreshold(_) => {
                AlarmType::GnocchiAggregationByMetricsThreshold
            },
            Self::GnocchiAggregationByResourcesThreshold(_) => {
                AlarmType::GnocchiAggregationByResourcesThreshold
            },
        }
    }

    /// Key this rule is stored under in an alarm payload
    pub fn key(&self) -> &'static str {
        self.alarm_type().rule_key()
    }

    /// Decode the rule object of an alarm of the given type
    pub fn from_value(alarm_type: AlarmType, value: Value) -> AodhResult<Self> {
        Ok(match alarm_type {
            AlarmType::Threshold => Self::Threshold(serde_json::from_value(value)?),
            AlarmType::Event => Self::Event(serde_json::from_value(value)?),
            AlarmType::Composite => Self::Composite(CompositeRule(value)),
            AlarmType::GnocchiResourcesThreshold => {
                Self::GnocchiResourcesThreshold(serde_json::from_value(value)?)
            },
            AlarmType::GnocchiAggregationByMetricsThreshold => {
                Self::GnocchiAggregationByMetricsThreshold(serde_json::from_value(value)?)
            },
            AlarmType::GnocchiAggregationByResourcesThreshold => {
                Self::GnocchiAggregationByResourcesThreshold(serde_json::from_value(value)?)
            },
        })
    }

    pub fn to_value(&self) -> AodhResult<Value> {
        Ok(match self {
            Self::Threshold(rule) => serde_json::to_value(rule)?,
            Self::Event(rule) => serde_json::to_value(rule)?,
            Self::Composite(rule) => rule.0.clone(),
            Self::GnocchiResourcesThreshold(rule) => serde_json::to_value(rule)?,
            Self::GnocchiAggregationByMetricsThreshold(rule) => serde_json::to_value(rule)?,
            Self::GnocchiAggregationByResourcesThreshold(rule) => serde_json::to_value(rule)?,
        })
    }
}
