//! Service capabilities

use errors::AodhResult;
use serde_json::Value;

use crate::http::HttpClient;

/// Manager for `/v2/capabilities`
#[derive(Debug, Clone, Copy)]
pub struct CapabilitiesManager<'a> {
    http: &'a HttpClient,
}

impl<'a> CapabilitiesManager<'a> {
    pub fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    /// Query capabilities and storage capabilities of the service
    pub async fn list(&self) -> AodhResult<Value> {
        self.http.get("v2/capabilities").await
    }
}
