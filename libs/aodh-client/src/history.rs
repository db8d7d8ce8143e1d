//! Alarm history endpoints

use aodh_model::AlarmHistoryEntry;
use errors::AodhResult;
use serde_json::{json, Value};

use crate::http::{into_list, path_segment, HttpClient};
use crate::pagination::{with_query, PaginationOptions};

const HISTORY_QUERY_PATH: &str = "v2/query/alarms/history";

/// Manager for alarm change history
#[derive(Debug, Clone, Copy)]
pub struct AlarmHistoryManager<'a> {
    http: &'a HttpClient,
}

impl<'a> AlarmHistoryManager<'a> {
    pub fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    /// History of one alarm
    pub async fn get(
        &self,
        alarm_id: &str,
        pagination: &PaginationOptions,
    ) -> AodhResult<Vec<Value>> {
        let path = with_query(
            &format!("v2/alarms/{}/history", path_segment(alarm_id)),
            &[pagination.to_query_string()],
        );
        into_list(self.http.get(&path).await?)
    }

    /// History across all alarms, optionally filtered by a complex query
    pub async fn search(
        &self,
        query: Option<&str>,
        pagination: &PaginationOptions,
    ) -> AodhResult<Vec<Value>> {
        let path = with_query(HISTORY_QUERY_PATH, &[pagination.to_query_string()]);
        let body = match query {
            Some(query) => json!({ "filter": query }),
            None => json!({}),
        };
        into_list(self.http.post(&path, &body).await?)
    }

    /// [`AlarmHistoryManager::get`] decoded into typed entries
    pub async fn entries(
        &self,
        alarm_id: &str,
        pagination: &PaginationOptions,
    ) -> AodhResult<Vec<AlarmHistoryEntry>> {
        self.get(alarm_id, pagination)
            .await?
            .into_iter()
            .map(|entry| Ok(serde_json::from_value(entry)?))
            .collect()
    }
}
