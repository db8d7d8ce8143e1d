//! Thin JSON transport over reqwest
//!
//! Every manager goes through [`HttpClient`]. Paths are relative to the
//! configured endpoint (`v2/alarms/...`). Non-success responses become
//! [`AodhError::Http`] with the server's fault string; nothing is retried.

use errors::{AodhError, AodhResult};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::{Method, RequestBuilder};
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;

const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Everything but RFC 3986 unreserved characters
const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a value used as one path segment, e.g. an alarm id
pub fn path_segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT_ENCODE_SET).to_string()
}

/// HTTP client bound to one Aodh endpoint
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> AodhResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = &config.auth_token {
            let mut value =
                HeaderValue::from_str(token).map_err(|e| AodhError::InvalidConfig {
                    field: "auth_token".to_string(),
                    reason: e.to_string(),
                })?;
            value.set_sensitive(true);
            headers.insert(HeaderName::from_static(AUTH_TOKEN_HEADER), value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .danger_accept_invalid_certs(config.insecure)
            .user_agent(concat!("aodh-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a path relative to the endpoint
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get(&self, path: &str) -> AodhResult<Value> {
        self.send(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> AodhResult<Value> {
        self.send(Method::POST, path, Some(body)).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> AodhResult<Value> {
        self.send(Method::PUT, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> AodhResult<Value> {
        self.send(Method::DELETE, path, None).await
    }

    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> AodhResult<Value> {
        let url = self.url(path);
        debug!("{} {}", method, url);

        let mut request: RequestBuilder = self.client.request(method.clone(), &url);
        if let Some(body) = body {
            // .json() also sets Content-Type: application/json
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            debug!("{} {} failed with {}", method, url, status);
            return Err(AodhError::from_response(status.as_u16(), &text));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

/// Unwrap a JSON list response; an empty body counts as an empty list
pub(crate) fn into_list(value: Value) -> AodhResult<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        other => Err(AodhError::Deserialization(format!(
            "expected a JSON list, got {}",
            other
        ))),
    }
}
