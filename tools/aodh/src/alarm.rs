//! Alarm commands
//!
//! Flags are turned into JSON fragments: only the flags that were given end
//! up in the payload. Rule flags are offered to every rule shape they apply
//! to; the rule cleaner then keeps the one matching the alarm's type.

use anyhow::Result;
use aodh_client::{Client, PaginationOptions};
use aodh_model::{
    clean_rules, Alarm, AlarmRule, AlarmState, AlarmType, ComparisonOperator, QueryItem,
    Severity, TimeConstraint,
};
use clap::{Args, Subcommand};
use colored::*;
use errors::{validation_error, AodhError, AodhResult};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use tracing::warn;

use crate::output::{list2cols, render_list, render_object, OutputFormat};

/// Columns shown by `alarm list` and `alarm query`
pub const LIST_COLS: [&str; 6] = ["alarm_id", "type", "name", "state", "severity", "enabled"];

const OPERATOR_SYMBOLS: [(&str, &str); 6] = [
    ("lt", "<"),
    ("le", "<="),
    ("eq", "=="),
    ("ne", "!="),
    ("ge", ">="),
    ("gt", ">"),
];

#[derive(Subcommand)]
pub enum AlarmCommands {
    /// Create an alarm
    #[command(about = "Create an alarm")]
    Create {
        #[command(flatten)]
        fields: AlarmFields,
    },

    /// List alarms
    #[command(about = "List alarms, optionally filtered by field values")]
    List {
        /// Filter as key=value[;key=value], repeatable
        #[arg(long = "filter", value_name = "KEY=VALUE")]
        filters: Vec<String>,

        /// Deprecated: use `alarm query` instead
        #[arg(long, hide = true)]
        query: Option<String>,

        #[command(flatten)]
        pagination: PaginationArgs,
    },

    /// Query alarms with a complex query expression
    #[command(about = "Query alarms, e.g. '{\"=\": {\"type\": \"threshold\"}}'")]
    Query {
        /// JSON query expression
        query: String,
    },

    /// Show an alarm
    #[command(about = "Show an alarm by id or name")]
    Show {
        #[command(flatten)]
        target: AlarmTarget,
    },

    /// Update an alarm
    #[command(about = "Update an alarm; only the given fields change")]
    Update {
        /// ID of the alarm
        alarm_id: String,

        #[command(flatten)]
        fields: AlarmFields,
    },

    /// Delete an alarm
    #[command(about = "Delete an alarm")]
    Delete {
        /// ID of the alarm
        alarm_id: String,
    },

    /// Get or set the state of an alarm
    #[command(subcommand)]
    State(StateCommands),
}

#[derive(Subcommand)]
pub enum StateCommands {
    /// Show the state of an alarm
    Get {
        /// ID of the alarm
        alarm_id: String,
    },

    /// Set the state of an alarm
    Set {
        /// ID of the alarm
        alarm_id: String,

        /// ok, alarm or "insufficient data"
        #[arg(long)]
        state: AlarmState,
    },
}

/// Alarm selected by id or by unique name
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct AlarmTarget {
    /// ID of the alarm
    pub alarm_id: Option<String>,

    /// Name of the alarm
    #[arg(long)]
    pub name: Option<String>,
}

/// `--limit` / `--marker` / `--sort`
#[derive(Args, Debug, Clone, Default)]
pub struct PaginationArgs {
    /// Number of items to return
    #[arg(long)]
    pub limit: Option<u32>,

    /// Last item of the previous page
    #[arg(long)]
    pub marker: Option<String>,

    /// Sort key and direction, e.g. name:asc; repeatable
    #[arg(long = "sort", value_name = "KEY[:DIR]")]
    pub sorts: Vec<String>,
}

impl PaginationArgs {
    pub fn options(&self) -> PaginationOptions {
        PaginationOptions {
            limit: self.limit,
            marker: self.marker.clone(),
            sorts: self.sorts.clone(),
        }
    }
}

/// Attribute and rule flags shared by `create` and `update`
#[derive(Args, Debug, Clone, Default)]
pub struct AlarmFields {
    /// Name of the alarm
    #[arg(long)]
    pub name: Option<String>,

    /// Type of the alarm
    #[arg(short = 't', long = "type")]
    pub alarm_type: Option<AlarmType>,

    /// Free text description
    #[arg(long)]
    pub description: Option<String>,

    /// Initial state
    #[arg(long)]
    pub state: Option<AlarmState>,

    /// low, moderate or critical
    #[arg(long)]
    pub severity: Option<Severity>,

    /// Whether the alarm is evaluated
    #[arg(long)]
    pub enabled: Option<bool>,

    /// Re-run actions on every evaluation while the state is unchanged
    #[arg(long)]
    pub repeat_actions: Option<bool>,

    /// URL to invoke on transition to alarm; repeatable
    #[arg(long = "alarm-action", value_name = "URL")]
    pub alarm_actions: Vec<String>,

    /// URL to invoke on transition to ok; repeatable
    #[arg(long = "ok-action", value_name = "URL")]
    pub ok_actions: Vec<String>,

    /// URL to invoke on transition to insufficient data; repeatable
    #[arg(long = "insufficient-data-action", value_name = "URL")]
    pub insufficient_data_actions: Vec<String>,

    /// name=..;start=<cron>;duration=<secs>[;description=..][;timezone=..]; repeatable
    #[arg(long = "time-constraint", value_name = "CONSTRAINT")]
    pub time_constraints: Vec<TimeConstraint>,

    // ===== Rule flags =====
    /// Meter to evaluate (threshold)
    #[arg(short = 'm', long, help_heading = "Rule")]
    pub meter_name: Option<String>,

    /// Threshold to compare against
    #[arg(long, help_heading = "Rule")]
    pub threshold: Option<f64>,

    /// lt, le, eq, ne, ge or gt
    #[arg(long, help_heading = "Rule")]
    pub comparison_operator: Option<ComparisonOperator>,

    /// Number of periods to evaluate over
    #[arg(long, help_heading = "Rule")]
    pub evaluation_periods: Option<u32>,

    /// Length of each period in seconds (threshold)
    #[arg(long, help_heading = "Rule")]
    pub period: Option<u32>,

    /// max, min, avg, sum or count (threshold)
    #[arg(long, help_heading = "Rule")]
    pub statistic: Option<String>,

    /// key[op]data_type::value;... for threshold and event rules,
    /// a JSON resource search (starting with `{`) for
    /// gnocchi_aggregation_by_resources_threshold
    #[arg(short = 'q', long, help_heading = "Rule")]
    pub query: Option<String>,

    /// Event type to match (event)
    #[arg(long, help_heading = "Rule")]
    pub event_type: Option<String>,

    /// JSON and/or tree of sub-rules (composite)
    #[arg(long, help_heading = "Rule")]
    pub composite_rule: Option<String>,

    /// Aggregation granularity in seconds (gnocchi)
    #[arg(long, help_heading = "Rule")]
    pub granularity: Option<u64>,

    /// Aggregation method (gnocchi)
    #[arg(long, help_heading = "Rule")]
    pub aggregation_method: Option<String>,

    /// Metric name or id (gnocchi); repeatable for by-metrics alarms
    #[arg(long = "metric", help_heading = "Rule")]
    pub metrics: Vec<String>,

    /// Resource type (gnocchi)
    #[arg(long, help_heading = "Rule")]
    pub resource_type: Option<String>,

    /// Resource id (gnocchi_resources_threshold)
    #[arg(long, help_heading = "Rule")]
    pub resource_id: Option<String>,
}

/// Insert `value` under `key` when present
fn put<T: Into<Value>>(map: &mut Map<String, Value>, key: &str, value: Option<T>) {
    if let Some(value) = value {
        map.insert(key.to_string(), value.into());
    }
}

impl AlarmFields {
    /// Top-level attributes that were given
    pub fn attributes(&self) -> Map<String, Value> {
        let mut map = Map::new();
        put(&mut map, "name", self.name.clone());
        put(&mut map, "type", self.alarm_type.map(|t| t.as_str()));
        put(&mut map, "description", self.description.clone());
        put(&mut map, "state", self.state.map(|s| s.as_str()));
        put(&mut map, "severity", self.severity.map(|s| s.as_str()));
        put(&mut map, "enabled", self.enabled);
        put(&mut map, "repeat_actions", self.repeat_actions);
        for (key, actions) in [
            ("alarm_actions", &self.alarm_actions),
            ("ok_actions", &self.ok_actions),
            ("insufficient_data_actions", &self.insufficient_data_actions),
        ] {
            if !actions.is_empty() {
                map.insert(key.to_string(), json!(actions));
            }
        }
        if !self.time_constraints.is_empty() {
            map.insert("time_constraints".to_string(), json!(self.time_constraints));
        }
        map
    }

    /// Fields shared by the gnocchi rule shapes
    fn gnocchi_common(&self, rule: &mut Map<String, Value>) {
        put(rule, "aggregation_method", self.aggregation_method.clone());
        put(rule, "granularity", self.granularity);
        put(rule, "threshold", self.threshold);
        put(rule, "comparison_operator", self.comparison_operator.map(|o| o.as_str()));
        put(rule, "evaluation_periods", self.evaluation_periods);
    }

    /// One rule fragment per alarm type the given flags apply to
    pub fn rule_fragments(&self) -> AodhResult<Map<String, Value>> {
        // A JSON object is a gnocchi resource search, anything else a simple query
        let (simple_query, resource_search) = match self.query.as_deref().map(str::trim) {
            Some(q) if q.starts_with('{') => (None, Some(q.to_string())),
            Some(q) => {
                let items = QueryItem::parse_list(q)
                    .map_err(|reason| AodhError::invalid_parameter("--query", reason))?;
                (Some(serde_json::to_value(items)?), None)
            },
            None => (None, None),
        };

        let mut threshold = Map::new();
        put(&mut threshold, "meter_name", self.meter_name.clone());
        put(&mut threshold, "threshold", self.threshold);
        put(&mut threshold, "comparison_operator", self.comparison_operator.map(|o| o.as_str()));
        put(&mut threshold, "evaluation_periods", self.evaluation_periods);
        put(&mut threshold, "period", self.period);
        put(&mut threshold, "statistic", self.statistic.clone());
        put(&mut threshold, "query", simple_query.clone());

        let mut event = Map::new();
        put(&mut event, "event_type", self.event_type.clone());
        put(&mut event, "query", simple_query);

        let mut resources = Map::new();
        put(&mut resources, "metric", self.metrics.first().cloned());
        put(&mut resources, "resource_id", self.resource_id.clone());
        put(&mut resources, "resource_type", self.resource_type.clone());
        self.gnocchi_common(&mut resources);

        let mut by_metrics = Map::new();
        if !self.metrics.is_empty() {
            by_metrics.insert("metrics".to_string(), json!(self.metrics));
        }
        self.gnocchi_common(&mut by_metrics);

        let mut by_resources = Map::new();
        put(&mut by_resources, "metric", self.metrics.first().cloned());
        put(&mut by_resources, "query", resource_search);
        put(&mut by_resources, "resource_type", self.resource_type.clone());
        self.gnocchi_common(&mut by_resources);

        let mut fragments = Map::new();
        for (alarm_type, rule) in [
            (AlarmType::Threshold, threshold),
            (AlarmType::Event, event),
            (AlarmType::GnocchiResourcesThreshold, resources),
            (AlarmType::GnocchiAggregationByMetricsThreshold, by_metrics),
            (AlarmType::GnocchiAggregationByResourcesThreshold, by_resources),
        ] {
            if !rule.is_empty() {
                fragments.insert(alarm_type.rule_key().to_string(), Value::Object(rule));
            }
        }

        if let Some(raw) = &self.composite_rule {
            let tree: Value = serde_json::from_str(raw).map_err(|e| {
                AodhError::invalid_parameter("--composite-rule", format!("invalid JSON: {}", e))
            })?;
            fragments.insert(AlarmType::Composite.rule_key().to_string(), tree);
        }

        Ok(fragments)
    }

    /// A by-resources alarm only takes `--query` as a JSON resource search
    fn check_resource_search(&self, alarm_type: AlarmType) -> AodhResult<()> {
        let Some(query) = self.query.as_deref().map(str::trim) else {
            return Ok(());
        };
        if alarm_type != AlarmType::GnocchiAggregationByResourcesThreshold {
            return Ok(());
        }
        if !query.starts_with('{') || serde_json::from_str::<Value>(query).is_err() {
            return Err(AodhError::invalid_parameter(
                "--query",
                format!(
                    "{} alarms need a JSON resource search, e.g. '{{\"=\": {{\"server_group\": \"web\"}}}}'",
                    alarm_type
                ),
            ));
        }
        Ok(())
    }

    /// Check the flags a new alarm of `alarm_type` cannot do without
    pub fn validate_for_create(&self, alarm_type: AlarmType) -> AodhResult<()> {
        self.check_resource_search(alarm_type)?;
        let missing = match alarm_type {
            AlarmType::Threshold if self.meter_name.is_none() || self.threshold.is_none() => {
                Some("-m/--meter-name and --threshold")
            },
            AlarmType::Composite if self.composite_rule.is_none() => Some("--composite-rule"),
            AlarmType::GnocchiResourcesThreshold
                if self.metrics.is_empty()
                    || self.threshold.is_none()
                    || self.resource_id.is_none()
                    || self.resource_type.is_none() =>
            {
                Some("--metric, --threshold, --resource-id and --resource-type")
            },
            AlarmType::GnocchiAggregationByMetricsThreshold
                if self.metrics.is_empty() || self.threshold.is_none() =>
            {
                Some("--metric and --threshold")
            },
            AlarmType::GnocchiAggregationByResourcesThreshold
                if self.metrics.is_empty()
                    || self.threshold.is_none()
                    || self.query.is_none()
                    || self.resource_type.is_none() =>
            {
                Some("--metric, --threshold, --query and --resource-type")
            },
            _ => None,
        };

        match missing {
            Some(flags) => Err(validation_error!(
                "{} alarm requires {} parameters",
                alarm_type,
                flags
            )),
            None => Ok(()),
        }
    }

    /// Typed alarm for `create`; fails before any request is made
    pub fn to_alarm(&self) -> AodhResult<Alarm> {
        let alarm_type = self
            .alarm_type
            .ok_or_else(|| AodhError::invalid_parameter("--type", "required to create an alarm"))?;
        if self.name.is_none() {
            return Err(AodhError::invalid_parameter(
                "--name",
                "required to create an alarm",
            ));
        }
        self.validate_for_create(alarm_type)?;

        let mut fragments = self.rule_fragments()?;
        clean_rules(alarm_type.as_str(), &mut fragments);
        let rule_value = fragments
            .remove(alarm_type.rule_key())
            .unwrap_or_else(|| Value::Object(Map::new()));

        let mut attributes = self.attributes();
        attributes.remove("type");

        Ok(Alarm {
            rule: AlarmRule::from_value(alarm_type, rule_value)?,
            attributes: serde_json::from_value(Value::Object(attributes))?,
        })
    }

    /// Update fragment: given attributes plus every applicable rule fragment
    pub fn to_update(&self) -> AodhResult<Map<String, Value>> {
        if let Some(alarm_type) = self.alarm_type {
            self.check_resource_search(alarm_type)?;
        }
        let mut update = self.attributes();
        update.extend(self.rule_fragments()?);
        if update.is_empty() {
            return Err(validation_error!("nothing to update, give at least one field"));
        }
        Ok(update)
    }
}

/// Parse repeated `key=value[;key=value]` filter flags
pub fn parse_filters(raw: &[String]) -> AodhResult<BTreeMap<String, String>> {
    let mut filters = BTreeMap::new();
    for pair in raw.iter().flat_map(|f| f.split(';')).map(str::trim) {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            AodhError::invalid_parameter("--filter", format!("'{}' is not key=value", pair))
        })?;
        if key.trim().is_empty() {
            return Err(AodhError::invalid_parameter(
                "--filter",
                format!("'{}' has an empty key", pair),
            ));
        }
        filters.insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok(filters)
}

/// Flatten an alarm for display: rule fields move to the top level,
/// queries become readable expressions, nested JSON is pretty-printed
pub fn format_alarm(mut alarm: Map<String, Value>) -> Map<String, Value> {
    let composite_key = AlarmType::Composite.rule_key();
    if let Some(tree) = alarm.get(composite_key).filter(|v| aodh_model::is_truthy(v)) {
        let pretty = serde_json::to_string_pretty(tree).unwrap_or_else(|_| tree.to_string());
        alarm.insert(composite_key.to_string(), Value::String(pretty));
        return alarm;
    }

    for alarm_type in AlarmType::ALL {
        if let Some(Value::Object(rule)) = alarm.remove(alarm_type.rule_key()) {
            alarm.extend(rule);
        }
    }

    if let Some(constraints) = alarm
        .get("time_constraints")
        .filter(|v| aodh_model::is_truthy(v))
    {
        let pretty =
            serde_json::to_string_pretty(constraints).unwrap_or_else(|_| constraints.to_string());
        alarm.insert("time_constraints".to_string(), Value::String(pretty));
    }

    if let Some(Value::Array(items)) = alarm.get("query") {
        let rows: Vec<String> = items
            .iter()
            .map(|item| {
                let op = item.get("op").and_then(Value::as_str).unwrap_or("eq");
                let symbol = OPERATOR_SYMBOLS
                    .iter()
                    .find(|(name, _)| *name == op)
                    .map_or(op, |(_, symbol)| *symbol);
                format!(
                    "{} {} {}",
                    item.get("field").and_then(Value::as_str).unwrap_or_default(),
                    symbol,
                    item.get("value").map(crate::output::cell).unwrap_or_default()
                )
            })
            .collect();
        alarm.insert("query".to_string(), Value::String(rows.join(" AND\n")));
    }

    alarm
}

fn as_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("result".to_string(), other);
            map
        },
    }
}

fn print_alarms(alarms: &[Value], format: OutputFormat) -> Result<()> {
    println!("{}", render_list(&list2cols(&LIST_COLS, alarms), format)?);
    Ok(())
}

fn print_alarm(alarm: Value, format: OutputFormat) -> Result<()> {
    let alarm = as_object(alarm);
    let alarm = match format {
        OutputFormat::Table => format_alarm(alarm),
        _ => alarm,
    };
    println!("{}", render_object(&alarm, format)?);
    Ok(())
}

fn print_state(state: Value, format: OutputFormat) -> Result<()> {
    let mut map = Map::new();
    map.insert("state".to_string(), state);
    println!("{}", render_object(&map, format)?);
    Ok(())
}

pub async fn handle_command(cmd: AlarmCommands, client: &Client, format: OutputFormat) -> Result<()> {
    let alarms = client.alarm();

    match cmd {
        AlarmCommands::Create { fields } => {
            let alarm = fields.to_alarm()?;
            let created = alarms.create(&alarm).await?;
            print_alarm(created, format)?;
        },
        AlarmCommands::List {
            filters,
            query,
            pagination,
        } => {
            let rows = match query.filter(|q| !q.is_empty()) {
                Some(query) => {
                    warn!(
                        "'alarm list --query' is deprecated and will be removed, use 'alarm query' instead"
                    );
                    alarms.query(&query).await?
                },
                None => {
                    alarms
                        .list(&parse_filters(&filters)?, &pagination.options())
                        .await?
                },
            };
            print_alarms(&rows, format)?;
        },
        AlarmCommands::Query { query } => {
            let rows = alarms.query(&query).await?;
            print_alarms(&rows, format)?;
        },
        AlarmCommands::Show { target } => {
            let alarm = match (target.alarm_id, target.name) {
                (Some(alarm_id), _) => alarms.get(&alarm_id).await?,
                (None, Some(name)) => alarms.find_by_name(&name).await?,
                (None, None) => return Err(validation_error!("an alarm id or --name is required").into()),
            };
            print_alarm(alarm, format)?;
        },
        AlarmCommands::Update { alarm_id, fields } => {
            let updated = alarms.update(&alarm_id, fields.to_update()?).await?;
            print_alarm(updated, format)?;
        },
        AlarmCommands::Delete { alarm_id } => {
            alarms.delete(&alarm_id).await?;
            eprintln!("{} Alarm {} deleted", "✓".green(), alarm_id.bright_white());
        },
        AlarmCommands::State(StateCommands::Get { alarm_id }) => {
            print_state(alarms.get_state(&alarm_id).await?, format)?;
        },
        AlarmCommands::State(StateCommands::Set { alarm_id, state }) => {
            print_state(alarms.set_state(&alarm_id, state).await?, format)?;
        },
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    fn threshold_fields() -> AlarmFields {
        AlarmFields {
            name: Some("cpu-high".to_string()),
            alarm_type: Some(AlarmType::Threshold),
            meter_name: Some("cpu_util".to_string()),
            threshold: Some(80.0),
            comparison_operator: Some(ComparisonOperator::Gt),
            query: Some("resource_id=vm-1".to_string()),
            severity: Some(Severity::Critical),
            alarm_actions: vec!["log://".to_string()],
            ..AlarmFields::default()
        }
    }

    #[test]
    fn test_create_builds_single_rule() {
        let alarm = threshold_fields().to_alarm().unwrap();
        let body = serde_json::to_value(&alarm).unwrap();

        assert_eq!(body["type"], "threshold");
        assert_eq!(body["name"], "cpu-high");
        assert_eq!(body["severity"], "critical");
        assert_eq!(body["alarm_actions"], json!(["log://"]));
        assert_eq!(body["threshold_rule"]["meter_name"], "cpu_util");
        assert_eq!(
            body["threshold_rule"]["query"],
            json!([{"field": "resource_id", "op": "eq", "value": "vm-1"}])
        );
        assert!(body.get("event_rule").is_none());
        assert!(body.get("gnocchi_resources_threshold_rule").is_none());
    }

    #[test]
    fn test_create_validates_required_flags() {
        let fields = AlarmFields {
            meter_name: None,
            ..threshold_fields()
        };
        let err = fields.to_alarm().unwrap_err();
        assert!(err.to_string().contains("--meter-name"));

        let fields = AlarmFields {
            name: Some("combo".to_string()),
            alarm_type: Some(AlarmType::Composite),
            ..AlarmFields::default()
        };
        assert!(fields.to_alarm().unwrap_err().to_string().contains("--composite-rule"));

        let fields = AlarmFields {
            alarm_type: None,
            ..threshold_fields()
        };
        assert_eq!(fields.to_alarm().unwrap_err().status_code(), 400);
    }

    #[test]
    fn test_event_alarm_needs_no_rule_flags() {
        let fields = AlarmFields {
            name: Some("any-event".to_string()),
            alarm_type: Some(AlarmType::Event),
            ..AlarmFields::default()
        };
        let body = serde_json::to_value(fields.to_alarm().unwrap()).unwrap();
        assert_eq!(body["event_rule"], json!({}));
    }

    #[test]
    fn test_composite_rule_must_be_json() {
        let fields = AlarmFields {
            name: Some("combo".to_string()),
            alarm_type: Some(AlarmType::Composite),
            composite_rule: Some("{not json".to_string()),
            ..AlarmFields::default()
        };
        let err = fields.to_alarm().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PARAMETER");
    }

    #[test]
    fn test_update_offers_rule_fields_to_every_shape() {
        let fields = AlarmFields {
            threshold: Some(90.0),
            ..AlarmFields::default()
        };
        let update = fields.to_update().unwrap();
        assert_eq!(update["threshold_rule"], json!({"threshold": 90.0}));
        assert_eq!(
            update["gnocchi_aggregation_by_metrics_threshold_rule"],
            json!({"threshold": 90.0})
        );
        assert!(update.get("event_rule").is_none());
        assert!(update.get("name").is_none());
    }

    #[test]
    fn test_json_query_goes_to_resource_search_only() {
        let fields = AlarmFields {
            name: Some("by-resources".to_string()),
            alarm_type: Some(AlarmType::GnocchiAggregationByResourcesThreshold),
            metrics: vec!["cpu".to_string()],
            threshold: Some(1.0),
            resource_type: Some("instance".to_string()),
            query: Some(r#"{"=": {"server_group": "web"}}"#.to_string()),
            ..AlarmFields::default()
        };
        let fragments = fields.rule_fragments().unwrap();
        assert!(fragments["threshold_rule"].get("query").is_none());
        assert!(fragments.get("event_rule").is_none());

        let body = serde_json::to_value(fields.to_alarm().unwrap()).unwrap();
        assert_eq!(
            body["gnocchi_aggregation_by_resources_threshold_rule"]["query"],
            r#"{"=": {"server_group": "web"}}"#
        );
    }

    #[test]
    fn test_simple_query_is_rejected_for_resource_search_alarm() {
        let fields = AlarmFields {
            name: Some("by-resources".to_string()),
            alarm_type: Some(AlarmType::GnocchiAggregationByResourcesThreshold),
            metrics: vec!["cpu".to_string()],
            threshold: Some(1.0),
            resource_type: Some("instance".to_string()),
            query: Some("server_group=web".to_string()),
            ..AlarmFields::default()
        };
        let err = fields.to_alarm().unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("--query"));
        assert!(fields.to_update().is_err());

        let fields = AlarmFields {
            query: Some("{not json".to_string()),
            ..fields
        };
        assert!(fields.to_alarm().is_err());
    }

    #[test]
    fn test_simple_query_update_without_type_is_kept() {
        let fields = AlarmFields {
            query: Some("server_group=web".to_string()),
            ..AlarmFields::default()
        };
        let update = fields.to_update().unwrap();
        assert_eq!(
            update["threshold_rule"]["query"],
            json!([{"field": "server_group", "op": "eq", "value": "web"}])
        );
    }

    #[test]
    fn test_empty_update_is_rejected() {
        assert!(AlarmFields::default().to_update().is_err());
    }

    #[test]
    fn test_parse_filters() {
        let filters = parse_filters(&[
            "type=threshold;severity=low".to_string(),
            " name = cpu ".to_string(),
        ])
        .unwrap();
        assert_eq!(filters.len(), 3);
        assert_eq!(filters["name"], "cpu");
        assert_eq!(filters["severity"], "low");

        assert!(parse_filters(&["type".to_string()]).is_err());
        assert!(parse_filters(&["=x".to_string()]).is_err());
        assert!(parse_filters(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_format_alarm_flattens_rule() {
        let alarm = json!({
            "name": "cpu-high",
            "type": "threshold",
            "time_constraints": [],
            "threshold_rule": {
                "threshold": 80,
                "query": [
                    {"field": "resource_id", "op": "eq", "value": "vm-1"},
                    {"field": "cpu", "op": "ge", "value": 2}
                ]
            }
        });
        let formatted = format_alarm(alarm.as_object().unwrap().clone());
        assert!(formatted.get("threshold_rule").is_none());
        assert_eq!(formatted["threshold"], 80);
        assert_eq!(formatted["query"], "resource_id == vm-1 AND\ncpu >= 2");
        assert_eq!(formatted["time_constraints"], json!([]));
    }

    #[test]
    fn test_format_composite_alarm() {
        let alarm = json!({"type": "composite", "composite_rule": {"or": []}});
        let formatted = format_alarm(alarm.as_object().unwrap().clone());
        assert!(formatted["composite_rule"].as_str().unwrap().contains("\"or\""));
    }
}
