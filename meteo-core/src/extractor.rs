use serde_json::Value;
use std::collections::BTreeSet;

use crate::{
    error::CoreError,
    table::{Table, cell_text},
};

/// Derives summary values from catalog and station tables.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    city_column: String,
    station_id_column: String,
    timestamp_column: String,
}

impl FieldExtractor {
    pub fn new(
        city_column: impl Into<String>,
        station_id_column: impl Into<String>,
        timestamp_column: impl Into<String>,
    ) -> Self {
        Self {
            city_column: city_column.into(),
            station_id_column: station_id_column.into(),
            timestamp_column: timestamp_column.into(),
        }
    }

    pub fn city_column(&self) -> &str {
        &self.city_column
    }

    pub fn cities(&self, table: &Table) -> Result<Vec<String>, CoreError> {
        unique_sorted(table, &self.city_column)
    }

    pub fn station_ids(&self, table: &Table) -> Result<Vec<String>, CoreError> {
        unique_sorted(table, &self.station_id_column)
    }

    /// Non-null timestamp cells in row order; empty when the column is absent.
    pub fn timestamps(&self, table: &Table) -> Vec<Value> {
        if table.is_empty() {
            return Vec::new();
        }

        match table.column_index(&self.timestamp_column) {
            Some(index) => table
                .column_values(index)
                .filter(|v| !v.is_null())
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }
}

/// Distinct non-null values of `column`, sorted ascending.
pub fn unique_sorted(table: &Table, column: &str) -> Result<Vec<String>, CoreError> {
    let index = table.require_column(column)?;

    let values: BTreeSet<String> = table
        .column_values(index)
        .filter_map(cell_text)
        .map(|text| text.into_owned())
        .collect();

    Ok(values.into_iter().collect())
}
