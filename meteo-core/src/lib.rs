//! Core library for the `meteo` station browser.
//!
//! This crate defines:
//! - Configuration loading and validation
//! - An in-memory `Table` plus the filters and extractors that reshape it
//! - The station navigator and the factory that orders it
//! - Remote sources for the catalog and per-station readings
//! - The data service façade and the interactive workflow
//!
//! It is used by `meteo-cli`, which supplies the console implementation of
//! [`UserInterface`].

pub mod config;
pub mod error;
pub mod extractor;
pub mod filter;
pub mod navigator;
pub mod orchestrator;
pub mod selection;
pub mod service;
pub mod source;
pub mod station;
pub mod table;
pub mod ui;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::{CoreError, ErrorCategory};
pub use extractor::FieldExtractor;
pub use filter::{FilterChain, TableFilter};
pub use navigator::{StationNavigator, build_navigator};
pub use orchestrator::{NavAction, WeatherStationOrchestrator};
pub use selection::SelectionService;
pub use service::WeatherDataService;
pub use source::{CatalogSource, HttpCatalogSource, HttpStationSource, StationSource};
pub use station::StationRecord;
pub use table::Table;
pub use ui::UserInterface;
