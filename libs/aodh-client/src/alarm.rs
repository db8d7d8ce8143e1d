//! Alarm CRUD, query and state endpoints

use aodh_model::{clean_rules, merge_alarm_update, type_name_of, Alarm, AlarmState, AlarmType};
use errors::{AodhError, AodhResult};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::http::{into_list, path_segment, HttpClient};
use crate::pagination::{filters_to_query, with_query, PaginationOptions};

const ALARMS_PATH: &str = "v2/alarms";
const QUERY_PATH: &str = "v2/query/alarms";

/// Manager for `/v2/alarms`
#[derive(Debug, Clone, Copy)]
pub struct AlarmManager<'a> {
    http: &'a HttpClient,
}

impl<'a> AlarmManager<'a> {
    pub fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    fn alarm_path(alarm_id: &str) -> String {
        format!("{}/{}", ALARMS_PATH, path_segment(alarm_id))
    }

    /// List alarms matching every `field == value` filter
    pub async fn list(
        &self,
        filters: &BTreeMap<String, String>,
        pagination: &PaginationOptions,
    ) -> AodhResult<Vec<Value>> {
        let path = with_query(
            ALARMS_PATH,
            &[filters_to_query(filters), pagination.to_query_string()],
        );
        into_list(self.http.get(&path).await?)
    }

    /// List alarms of one type
    pub async fn list_by_type(&self, alarm_type: AlarmType) -> AodhResult<Vec<Value>> {
        let filters = BTreeMap::from([("type".to_string(), alarm_type.as_str().to_string())]);
        self.list(&filters, &PaginationOptions::default()).await
    }

    /// Complex query, e.g. `{"=":{"type":"threshold"}}`
    ///
    /// The expression is sent as a string inside `{"filter": ...}`.
    pub async fn query(&self, query: &str) -> AodhResult<Vec<Value>> {
        let body = json!({ "filter": query });
        into_list(self.http.post(QUERY_PATH, &body).await?)
    }

    pub async fn get(&self, alarm_id: &str) -> AodhResult<Value> {
        self.http.get(&Self::alarm_path(alarm_id)).await
    }

    /// Fetch an alarm and decode it into the typed model
    pub async fn get_alarm(&self, alarm_id: &str) -> AodhResult<Alarm> {
        Alarm::from_value(self.get(alarm_id).await?)
    }

    /// Look an alarm up by its name; the name must be unique
    pub async fn find_by_name(&self, name: &str) -> AodhResult<Value> {
        let filters = BTreeMap::from([("name".to_string(), name.to_string())]);
        let mut matches = self.list(&filters, &PaginationOptions::default()).await?;
        match matches.len() {
            0 => Err(AodhError::not_found(format!("alarm named '{}'", name))),
            1 => Ok(matches.remove(0)),
            n => Err(AodhError::Conflict {
                resource: format!("{} alarms are named '{}', use the alarm id", n, name),
            }),
        }
    }

    pub async fn create(&self, alarm: &Alarm) -> AodhResult<Value> {
        let body = Value::Object(alarm.to_map()?);
        let created = self.http.post(ALARMS_PATH, &body).await?;
        info!("Created {}", alarm);
        Ok(created)
    }

    /// Create from a raw payload, dropping rule keys foreign to its `type`
    ///
    /// The type may be one this crate does not model; only the known rule
    /// keys that do not match it are dropped.
    pub async fn create_from_value(&self, alarm: Value) -> AodhResult<Value> {
        let Value::Object(mut alarm) = alarm else {
            return Err(AodhError::Validation(
                "alarm payload must be a JSON object".to_string(),
            ));
        };
        let alarm_type = type_name_of(&alarm)?.to_string();
        clean_rules(&alarm_type, &mut alarm);
        self.http.post(ALARMS_PATH, &Value::Object(alarm)).await
    }

    /// Merge `alarm_update` into the current alarm and PUT the result
    ///
    /// One GET followed by one PUT. A 404 from the GET is returned as is and
    /// no PUT is sent.
    pub async fn update(&self, alarm_id: &str, alarm_update: Map<String, Value>) -> AodhResult<Value> {
        let path = Self::alarm_path(alarm_id);
        let mut alarm = match self.http.get(&path).await? {
            Value::Object(alarm) => alarm,
            other => {
                return Err(AodhError::Deserialization(format!(
                    "alarm {} is not a JSON object: {}",
                    alarm_id, other
                )))
            },
        };

        if let Some(merged) = merge_alarm_update(&mut alarm, alarm_update)? {
            debug!("Merged {} into alarm {}", merged.rule_key(), alarm_id);
        }
        self.http.put(&path, &Value::Object(alarm)).await
    }

    pub async fn delete(&self, alarm_id: &str) -> AodhResult<()> {
        self.http.delete(&Self::alarm_path(alarm_id)).await?;
        info!("Deleted alarm {}", alarm_id);
        Ok(())
    }

    /// Raw state as returned by the server, usually a bare string
    pub async fn get_state(&self, alarm_id: &str) -> AodhResult<Value> {
        self.http
            .get(&format!("{}/state", Self::alarm_path(alarm_id)))
            .await
    }

    /// Set the state; the body is the quoted state name, e.g. `"ok"`
    pub async fn set_state(&self, alarm_id: &str, state: AlarmState) -> AodhResult<Value> {
        let body = Value::String(state.as_str().to_string());
        self.http
            .put(&format!("{}/state", Self::alarm_path(alarm_id)), &body)
            .await
    }
}
