//! Client configuration
//!
//! Layered with figment. Priority (highest to lowest):
//! 1. Explicit overrides (command-line flags)
//! 2. Environment variables prefixed with `AODH_`
//! 3. Config file (`--config <path>`, or `aodh.toml` / `aodh.yaml` / `aodh.json`
//!    in the working directory)
//! 4. Default values

use errors::{config_error, AodhError, AodhResult};
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "AODH_";

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8042";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the Aodh API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Base URL of the Aodh service, without the `/v2` suffix
    pub endpoint: String,
    /// Pre-issued Keystone token, sent as `X-Auth-Token`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Skip TLS certificate verification
    pub insecure: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            auth_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            insecure: false,
        }
    }
}

/// Values given on the command line; `None` leaves the lower layers alone
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,
}

impl ClientConfig {
    /// Load configuration from defaults, file, environment and overrides
    pub fn load(config_file: Option<&Path>, overrides: &ConfigOverrides) -> AodhResult<Self> {
        let figment = Self::figment(config_file, ENV_PREFIX)?
            .merge(Serialized::defaults(overrides));

        let config: Self = figment.extract()?;
        config.validate()?;
        debug!("Loaded client config for {}", config.endpoint);
        Ok(config)
    }

    /// Defaults, then file, then prefixed environment
    fn figment(config_file: Option<&Path>, env_prefix: &str) -> AodhResult<Figment> {
        let figment = Figment::from(Serialized::defaults(Self::default()));

        let figment = match config_file {
            Some(path) => merge_file(figment, path)?,
            None => figment
                .merge(Toml::file("aodh.toml"))
                .merge(Yaml::file("aodh.yaml"))
                .merge(Json::file("aodh.json")),
        };

        Ok(figment.merge(Env::prefixed(env_prefix)))
    }

    /// Check the endpoint and timeout
    pub fn validate(&self) -> AodhResult<()> {
        let url = url::Url::parse(&self.endpoint).map_err(|e| AodhError::InvalidConfig {
            field: "endpoint".to_string(),
            reason: format!("'{}' is not a valid URL: {}", self.endpoint, e),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AodhError::InvalidConfig {
                field: "endpoint".to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        if self.timeout_secs == 0 {
            return Err(AodhError::InvalidConfig {
                field: "timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Merge a config file, picking the provider by extension
fn merge_file(figment: Figment, path: &Path) -> AodhResult<Figment> {
    if !path.exists() {
        return Err(config_error!("Config file not found: {}", path.display()));
    }

    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| config_error!("Config file must have an extension"))?;

    match extension {
        "toml" => Ok(figment.merge(Toml::file(path))),
        "yaml" | "yml" => Ok(figment.merge(Yaml::file(path))),
        "json" => Ok(figment.merge(Json::file(path))),
        _ => Err(config_error!(
            "Unsupported config file format: {}",
            extension
        )),
    }
}
