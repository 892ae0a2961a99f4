use log::{debug, info};
use serde_json::Value;
use tokio::sync::OnceCell;

use crate::{
    Config,
    error::CoreError,
    extractor::FieldExtractor,
    filter::{ColumnSelection, FilterChain, KeywordFilter, Logged, TableFilter, TextFilter, compose},
    navigator::{StationNavigator, build_navigator},
    source::{CatalogSource, HttpCatalogSource, HttpStationSource, StationSource},
    station::StationRecord,
    table::Table,
};

/// Façade over the sources, filters and extractor.
///
/// The filtered catalog is fetched at most once per service and kept for
/// its whole lifetime.
#[derive(Debug)]
pub struct WeatherDataService {
    catalog_source: Box<dyn CatalogSource>,
    station_source: Box<dyn StationSource>,
    catalog_filter: FilterChain,
    column_filter: ColumnSelection,
    extractor: FieldExtractor,
    catalog: OnceCell<Table>,
}

impl WeatherDataService {
    pub fn new(
        catalog_source: Box<dyn CatalogSource>,
        station_source: Box<dyn StationSource>,
        catalog_filter: FilterChain,
        column_filter: ColumnSelection,
        extractor: FieldExtractor,
    ) -> Self {
        Self {
            catalog_source,
            station_source,
            catalog_filter,
            column_filter,
            extractor,
            catalog: OnceCell::new(),
        }
    }

    /// Wire the HTTP sources and the configured filters.
    pub fn from_config(config: &Config) -> Self {
        Self::with_sources(
            config,
            Box::new(HttpCatalogSource::from_config(config)),
            Box::new(HttpStationSource::from_config(config)),
        )
    }

    /// Configured filters around caller-supplied sources.
    pub fn with_sources(
        config: &Config,
        catalog_source: Box<dyn CatalogSource>,
        station_source: Box<dyn StationSource>,
    ) -> Self {
        let keyword = KeywordFilter::new(
            config.columns.station_id.clone(),
            config.filters.include_keyword.clone(),
            config.filters.exclude_keyword.clone(),
        );

        Self::new(
            catalog_source,
            station_source,
            compose(vec![Box::new(Logged::new(keyword))]),
            ColumnSelection::new(config.columns.station_data.clone()),
            FieldExtractor::new(
                config.columns.city.clone(),
                config.columns.station_id.clone(),
                config.columns.timestamp.clone(),
            ),
        )
    }

    /// Filtered catalog; loaded on first call, cached afterwards.
    pub async fn get_catalog(&self) -> Result<&Table, CoreError> {
        if let Some(cached) = self.catalog.get() {
            debug!("Using cached catalog ({} rows)", cached.len());
            return Ok(cached);
        }

        self.catalog.get_or_try_init(|| self.load_filtered_catalog()).await
    }

    async fn load_filtered_catalog(&self) -> Result<Table, CoreError> {
        let raw = self.catalog_source.load_catalog().await?;
        if raw.is_empty() {
            return Ok(Table::empty());
        }

        let filtered = self.catalog_filter.apply(&raw)?;
        info!("Catalog filtered from {} to {} rows", raw.len(), filtered.len());
        Ok(filtered)
    }

    pub async fn get_cities(&self) -> Result<Vec<String>, CoreError> {
        let catalog = self.get_catalog().await?;
        self.extractor.cities(catalog)
    }

    /// Navigator over the catalogued stations of `city`, empty if none match.
    pub async fn get_stations_for_city(&self, city: &str) -> Result<StationNavigator, CoreError> {
        let catalog = self.get_catalog().await?;

        let city_rows = TextFilter::new(self.extractor.city_column(), city).apply(catalog)?;
        let stations = self
            .extractor
            .station_ids(&city_rows)?
            .into_iter()
            .map(|id| StationRecord::new(id, city))
            .collect();

        Ok(build_navigator(stations))
    }

    /// Readings for one station, narrowed to the configured columns.
    pub async fn get_station_data(&self, station_id: &str) -> Result<Table, CoreError> {
        let raw = self.station_source.load_station(station_id).await?;
        if raw.is_empty() {
            return Ok(Table::empty());
        }

        self.column_filter.apply(&raw)
    }

    pub fn timestamps(&self, table: &Table) -> Vec<Value> {
        self.extractor.timestamps(table)
    }
}
