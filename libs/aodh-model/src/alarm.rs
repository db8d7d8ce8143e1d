//! Typed alarm representation
//!
//! An [`Alarm`] is the tagged union of its rule plus the attributes every
//! alarm shares. On the wire it is one flat JSON object carrying `type` and
//! the single `<type>_rule` key; unknown top-level fields are kept in
//! [`AlarmAttributes::extra`].

use errors::{AodhError, AodhResult};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

use crate::cleaner::clean_rules;
use crate::merge::alarm_type_of;
use crate::rule::AlarmRule;
use crate::types::{AlarmState, AlarmType, Severity};

/// Window during which an alarm is evaluated
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeConstraint {
    pub name: String,
    /// Cron expression marking the start of the window
    pub start: String,
    /// Window length in seconds
    pub duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl std::str::FromStr for TimeConstraint {
    type Err = String;

    /// Parse `name=<n>;start=<cron>;duration=<secs>[;description=..][;timezone=..]`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut constraint = TimeConstraint::default();
        let mut duration = None;

        for pair in s.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| format!("Malformed time constraint '{}': expected key=value", pair))?;
            let value = value.trim().to_string();
            match key.trim() {
                "name" => constraint.name = value,
                "start" => constraint.start = value,
                "duration" => {
                    duration = Some(
                        value
                            .parse::<u32>()
                            .map_err(|e| format!("Invalid time constraint duration '{}': {}", value, e))?,
                    )
                },
                "description" => constraint.description = Some(value),
                "timezone" => constraint.timezone = Some(value),
                other => return Err(format!("Unknown time constraint key '{}'", other)),
            }
        }

        if constraint.name.is_empty() || constraint.start.is_empty() {
            return Err(format!(
                "Time constraint '{}' requires name, start and duration",
                s
            ));
        }
        constraint.duration =
            duration.ok_or_else(|| format!("Time constraint '{}' requires a duration", s))?;
        Ok(constraint)
    }
}

/// Fields shared by every alarm type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlarmAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alarm_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<AlarmState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_actions: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alarm_actions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ok_actions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub insufficient_data_actions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub time_constraints: Vec<TimeConstraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_reason: Option<String>,
    /// Top-level fields this client does not model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An alarm with exactly one rule, matching its type
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct Alarm {
    pub rule: AlarmRule,
    pub attributes: AlarmAttributes,
}

impl Alarm {
    pub fn new(name: impl Into<String>, rule: AlarmRule) -> Self {
        Self {
            rule,
            attributes: AlarmAttributes {
                name: Some(name.into()),
                ..AlarmAttributes::default()
            },
        }
    }

    /// Decode a server payload
    pub fn from_value(value: Value) -> AodhResult<Self> {
        match value {
            Value::Object(map) => Self::try_from(map),
            other => Err(AodhError::Deserialization(format!(
                "alarm payload must be a JSON object, got {}",
                other
            ))),
        }
    }

    pub fn alarm_type(&self) -> AlarmType {
        self.rule.alarm_type()
    }

    pub fn alarm_id(&self) -> Option<&str> {
        self.attributes.alarm_id.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.attributes.name.as_deref()
    }

    /// Flat wire representation: attributes, `type` and the one rule key
    pub fn to_map(&self) -> AodhResult<Map<String, Value>> {
        let mut map = match serde_json::to_value(&self.attributes)? {
            Value::Object(map) => map,
            other => {
                return Err(AodhError::Serialization(format!(
                    "alarm attributes serialized to {}",
                    other
                )))
            },
        };
        let alarm_type = self.alarm_type();
        clean_rules(alarm_type.as_str(), &mut map);
        map.insert("type".to_string(), Value::String(alarm_type.as_str().to_string()));
        map.insert(self.rule.key().to_string(), self.rule.to_value()?);
        Ok(map)
    }
}

impl TryFrom<Map<String, Value>> for Alarm {
    type Error = AodhError;

    fn try_from(mut map: Map<String, Value>) -> Result<Self, Self::Error> {
        let alarm_type = alarm_type_of(&map)?;
        map.remove("type");
        clean_rules(alarm_type.as_str(), &mut map);

        let rule_value = map.remove(alarm_type.rule_key()).ok_or_else(|| {
            AodhError::Deserialization(format!(
                "{} alarm has no {}",
                alarm_type,
                alarm_type.rule_key()
            ))
        })?;
        let rule = AlarmRule::from_value(alarm_type, rule_value)?;
        let attributes = serde_json::from_value(Value::Object(map))?;

        Ok(Self { rule, attributes })
    }
}

impl Serialize for Alarm {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_map()
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl fmt::Display for Alarm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} alarm '{}' ({})",
            self.alarm_type(),
            self.name().unwrap_or("<unnamed>"),
            self.alarm_id().unwrap_or("unsaved")
        )
    }
}
