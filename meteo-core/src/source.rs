//! Remote data sources for the catalog and for individual stations.
//!
//! The HTTP implementations absorb transport and payload failures: they log a
//! warning and hand back an empty table, so callers only ever branch on
//! emptiness.

use async_trait::async_trait;
use log::{info, warn};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt::Debug;

use crate::{Config, error::CoreError, table::Table};

#[async_trait]
pub trait CatalogSource: Send + Sync + Debug {
    /// Full, unfiltered station catalog.
    async fn load_catalog(&self) -> Result<Table, CoreError>;
}

#[async_trait]
pub trait StationSource: Send + Sync + Debug {
    /// Recent readings for one station.
    async fn load_station(&self, station_id: &str) -> Result<Table, CoreError>;
}

/// Catalog served as a delimited text export.
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    url: String,
    delimiter: u8,
    http: Client,
}

impl HttpCatalogSource {
    pub fn new(url: impl Into<String>, delimiter: u8) -> Self {
        Self { url: url.into(), delimiter, http: Client::new() }
    }

    pub fn from_config(config: &Config) -> Self {
        // Config::validate guarantees an ASCII delimiter.
        Self::new(config.api.catalog_url.clone(), config.api.catalog_delimiter as u8)
    }

    async fn fetch(&self) -> Result<Table, CoreError> {
        info!("Fetching station catalog from {}", self.url);

        let body = fetch_text(&self.http, &self.url).await?;

        Table::from_csv(&body, self.delimiter).map_err(|e| CoreError::Payload {
            url: self.url.clone(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn load_catalog(&self) -> Result<Table, CoreError> {
        match self.fetch().await {
            Ok(table) => {
                info!("Catalog has {} rows", table.len());
                Ok(table)
            }
            Err(e) => {
                warn!("Catalog unavailable: {}", error_chain(&e));
                Ok(Table::empty())
            }
        }
    }
}

/// Station records served as JSON: `{"results": [{...}, ...]}`.
#[derive(Debug, Clone)]
pub struct HttpStationSource {
    url_template: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct RecordsResponse {
    #[serde(default)]
    results: Vec<Map<String, Value>>,
}

impl HttpStationSource {
    /// `url_template` must contain `{station_id}`.
    pub fn new(url_template: impl Into<String>) -> Self {
        Self { url_template: url_template.into(), http: Client::new() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api.station_url_template.clone())
    }

    fn url_for(&self, station_id: &str) -> String {
        self.url_template.replace(crate::config::STATION_ID_PLACEHOLDER, station_id)
    }

    async fn fetch(&self, url: &str) -> Result<Table, CoreError> {
        info!("Fetching station data from {url}");

        let body = fetch_text(&self.http, url).await?;

        let parsed: RecordsResponse =
            serde_json::from_str(&body).map_err(|e| CoreError::Payload {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        Ok(Table::from_records(parsed.results))
    }
}

#[async_trait]
impl StationSource for HttpStationSource {
    async fn load_station(&self, station_id: &str) -> Result<Table, CoreError> {
        let url = self.url_for(station_id);

        match self.fetch(&url).await {
            Ok(table) => {
                if table.is_empty() {
                    info!("No records for station '{station_id}'");
                }
                Ok(table)
            }
            Err(e) => {
                warn!("Station '{station_id}' unavailable: {}", error_chain(&e));
                Ok(Table::empty())
            }
        }
    }
}

async fn fetch_text(http: &Client, url: &str) -> Result<String, CoreError> {
    let transport = |source| CoreError::Transport { url: url.to_string(), source };

    http.get(url)
        .send()
        .await
        .and_then(|res| res.error_for_status())
        .map_err(transport)?
        .text()
        .await
        .map_err(transport)
}

fn error_chain(err: &CoreError) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
