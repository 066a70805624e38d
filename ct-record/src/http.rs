//! HTTP client for the `/cities` REST endpoint.

use crate::error::{CreateError, FetchError};
use crate::record::Record;
use crate::store::RecordStore;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use std::time::Duration;

/// Default base URL of the record store.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for [`HttpStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// A [`RecordStore`] backed by a remote REST server.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: Client,
    cities_url: String,
}

impl HttpStore {
    pub fn new(config: &StoreConfig) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(client, &config.base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            cities_url: cities_url(base_url),
        }
    }

    pub fn cities_url(&self) -> &str {
        &self.cities_url
    }
}

fn cities_url(base_url: &str) -> String {
    format!("{}/cities", base_url.trim_end_matches('/'))
}

#[async_trait]
impl RecordStore for HttpStore {
    async fn list(&self, min: f64) -> Result<Vec<Record>, FetchError> {
        debug!("GET {}?min={}", self.cities_url, min);
        let response = self
            .client
            .get(&self.cities_url)
            .query(&[("min", min.to_string())])
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            warn!("Bad response status for list: {}", response.status());
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Record::from_json_array(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }

    async fn create(&self, record: &Record) -> Result<(), CreateError> {
        debug!("POST {} {:?}", self.cities_url, record);
        let response = self
            .client
            .post(&self.cities_url)
            .json(record)
            .send()
            .await
            .map_err(|e| CreateError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            warn!("Bad response status for create: {}", response.status());
            return Err(CreateError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}
