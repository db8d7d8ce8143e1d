//! Aodh Client Library
//!
//! Async client for the Aodh v2 alarming API.
//!
//! # Example
//!
//! ```no_run
//! use aodh_client::{Client, ClientConfig, PaginationOptions};
//! use std::collections::BTreeMap;
//!
//! # async fn run() -> errors::AodhResult<()> {
//! let client = Client::new(&ClientConfig::default())?;
//! let filters = BTreeMap::from([("type".to_string(), "threshold".to_string())]);
//! let alarms = client
//!     .alarm()
//!     .list(&filters, &PaginationOptions::new().limit(10))
//!     .await?;
//! println!("{} threshold alarms", alarms.len());
//! # Ok(())
//! # }
//! ```

pub mod alarm;
pub mod capabilities;
pub mod config;
pub mod history;
pub mod http;
pub mod pagination;

pub use alarm::AlarmManager;
pub use capabilities::CapabilitiesManager;
pub use config::{ClientConfig, ConfigOverrides};
pub use history::AlarmHistoryManager;
pub use http::HttpClient;
pub use pagination::{filters_to_query, PaginationOptions};

use errors::AodhResult;

/// Entry point holding the shared transport
#[derive(Debug, Clone)]
pub struct Client {
    http: HttpClient,
}

impl Client {
    pub fn new(config: &ClientConfig) -> AodhResult<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
        })
    }

    pub fn alarm(&self) -> AlarmManager<'_> {
        AlarmManager::new(&self.http)
    }

    pub fn alarm_history(&self) -> AlarmHistoryManager<'_> {
        AlarmHistoryManager::new(&self.http)
    }

    pub fn capabilities(&self) -> CapabilitiesManager<'_> {
        CapabilitiesManager::new(&self.http)
    }
}
