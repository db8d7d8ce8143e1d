//! Core enumerations for Aodh alarms
//!
//! Wire names follow the Aodh v2 API exactly; `FromStr` additionally
//! accepts a few shell-friendly spellings for use on the command line.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Alarm Types
// ============================================================================

/// Alarm type, which also selects the single rule an alarm carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlarmType {
    Threshold,
    Event,
    Composite,
    GnocchiResourcesThreshold,
    GnocchiAggregationByMetricsThreshold,
    GnocchiAggregationByResourcesThreshold,
}

impl AlarmType {
    /// Every alarm type, in declaration order
    pub const ALL: [AlarmType; 6] = [
        AlarmType::Threshold,
        AlarmType::Event,
        AlarmType::Composite,
        AlarmType::GnocchiResourcesThreshold,
        AlarmType::GnocchiAggregationByMetricsThreshold,
        AlarmType::GnocchiAggregationByResourcesThreshold,
    ];

    /// Wire name of the type
    ///
    /// # Examples
    /// ```
    /// # use aodh_model::AlarmType;
    /// assert_eq!(AlarmType::Event.as_str(), "event");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            AlarmType::Threshold => "threshold",
            AlarmType::Event => "event",
            AlarmType::Composite => "composite",
            AlarmType::GnocchiResourcesThreshold => "gnocchi_resources_threshold",
            AlarmType::GnocchiAggregationByMetricsThreshold => {
                "gnocchi_aggregation_by_metrics_threshold"
            },
            AlarmType::GnocchiAggregationByResourcesThreshold => {
                "gnocchi_aggregation_by_resources_threshold"
            },
        }
    }

    /// Key under which an alarm of this type carries its rule
    ///
    /// # Examples
    /// ```
    /// # use aodh_model::AlarmType;
    /// assert_eq!(AlarmType::Threshold.rule_key(), "threshold_rule");
    /// ```
    pub fn rule_key(&self) -> &'static str {
        match self {
            AlarmType::Threshold => "threshold_rule",
            AlarmType::Event => "event_rule",
            AlarmType::Composite => "composite_rule",
            AlarmType::GnocchiResourcesThreshold => "gnocchi_resources_threshold_rule",
            AlarmType::GnocchiAggregationByMetricsThreshold => {
                "gnocchi_aggregation_by_metrics_threshold_rule"
            },
            AlarmType::GnocchiAggregationByResourcesThreshold => {
                "gnocchi_aggregation_by_resources_threshold_rule"
            },
        }
    }
}

impl fmt::Display for AlarmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AlarmType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| {
                format!(
                    "Invalid alarm type: '{}'. Valid values: {}",
                    s,
                    Self::ALL.map(|t| t.as_str()).join(", ")
                )
            })
    }
}

// ============================================================================
// Alarm State
// ============================================================================

/// Evaluation state of an alarm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlarmState {
    #[serde(rename = "ok")]
    Ok,
    #[serde(rename = "alarm")]
    Alarm,
    #[serde(
        rename = "insufficient data",
        alias = "insufficient_data",
        alias = "insufficient-data"
    )]
    InsufficientData,
}

impl AlarmState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlarmState::Ok => "ok",
            AlarmState::Alarm => "alarm",
            AlarmState::InsufficientData => "insufficient data",
        }
    }
}

impl fmt::Display for AlarmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AlarmState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ok" => Ok(AlarmState::Ok),
            "alarm" => Ok(AlarmState::Alarm),
            "insufficient data" | "insufficient_data" | "insufficient-data" => {
                Ok(AlarmState::InsufficientData)
            },
            _ => Err(format!(
                "Invalid alarm state: '{}'. Valid values: ok, alarm, insufficient data",
                s
            )),
        }
    }
}

// ============================================================================
// Severity
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Moderate,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Moderate => "moderate",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "moderate" => Ok(Severity::Moderate),
            "critical" => Ok(Severity::Critical),
            _ => Err(format!(
                "Invalid severity: '{}'. Valid values: low, moderate, critical",
                s
            )),
        }
    }
}

// ============================================================================
// Comparison Operator
// ============================================================================

/// Operator used by threshold rules and query items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonOperator {
    Lt,
    Le,
    Eq,
    Ne,
    Ge,
    Gt,
}

impl ComparisonOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOperator::Lt => "lt",
            ComparisonOperator::Le => "le",
            ComparisonOperator::Eq => "eq",
            ComparisonOperator::Ne => "ne",
            ComparisonOperator::Ge => "ge",
            ComparisonOperator::Gt => "gt",
        }
    }

    /// Parse the symbolic form used in CLI query expressions (`<`, `<=`, `=`, ...)
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "<" => Some(ComparisonOperator::Lt),
            "<=" => Some(ComparisonOperator::Le),
            "=" | "==" => Some(ComparisonOperator::Eq),
            "!=" => Some(ComparisonOperator::Ne),
            ">=" => Some(ComparisonOperator::Ge),
            ">" => Some(ComparisonOperator::Gt),
            _ => None,
        }
    }
}

impl Default for ComparisonOperator {
    fn default() -> Self {
        Self::Eq
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ComparisonOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lt" => Ok(ComparisonOperator::Lt),
            "le" => Ok(ComparisonOperator::Le),
            "eq" => Ok(ComparisonOperator::Eq),
            "ne" => Ok(ComparisonOperator::Ne),
            "ge" => Ok(ComparisonOperator::Ge),
            "gt" => Ok(ComparisonOperator::Gt),
            other => Self::from_symbol(other).ok_or_else(|| {
                format!(
                    "Invalid comparison operator: '{}'. Valid values: lt, le, eq, ne, ge, gt",
                    s
                )
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    #[test]
    fn test_alarm_type_wire_names_match_serde() {
        for alarm_type in AlarmType::ALL {
            let json = serde_json::to_value(alarm_type).unwrap();
            assert_eq!(json, alarm_type.as_str());
            assert_eq!(
                alarm_type.rule_key(),
                format!("{}_rule", alarm_type.as_str())
            );
        }
    }

    #[test]
    fn test_alarm_type_parse() {
        assert_eq!("event".parse::<AlarmType>().unwrap(), AlarmType::Event);
        assert_eq!(
            "gnocchi-aggregation-by-metrics-threshold"
                .parse::<AlarmType>()
                .unwrap(),
            AlarmType::GnocchiAggregationByMetricsThreshold
        );
        let err = "prometheus".parse::<AlarmType>().unwrap_err();
        assert!(err.contains("composite"));
    }

    #[test]
    fn test_alarm_state_spellings() {
        assert_eq!(
            "insufficient_data".parse::<AlarmState>().unwrap(),
            AlarmState::InsufficientData
        );
        assert_eq!(
            serde_json::to_string(&AlarmState::InsufficientData).unwrap(),
            "\"insufficient data\""
        );
        let state: AlarmState = serde_json::from_str("\"insufficient-data\"").unwrap();
        assert_eq!(state, AlarmState::InsufficientData);
        assert!("broken".parse::<AlarmState>().is_err());
    }

    #[test]
    fn test_comparison_operator_symbols() {
        assert_eq!(
            ">=".parse::<ComparisonOperator>().unwrap(),
            ComparisonOperator::Ge
        );
        assert_eq!(
            "GT".parse::<ComparisonOperator>().unwrap(),
            ComparisonOperator::Gt
        );
        assert_eq!(ComparisonOperator::from_symbol("!"), None);
    }
}
