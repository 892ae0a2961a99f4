//! Table-to-table transformations.
//!
//! Each filter is a [`TableFilter`]; filters compose with [`FilterChain`] and
//! pick up logging by being wrapped in [`Logged`]. The free functions are the
//! underlying operations and can be used directly.

use log::{debug, warn};
use std::fmt::Debug;

use crate::{
    error::CoreError,
    table::{Table, cell_text},
};

pub trait TableFilter: Send + Sync + Debug {
    fn apply(&self, table: &Table) -> Result<Table, CoreError>;

    /// Short name used in log lines.
    fn name(&self) -> &str;
}

/// Keep rows whose `column` contains `needle`, ignoring case. Nulls never match.
pub fn filter_by_column_text(table: &Table, column: &str, needle: &str) -> Result<Table, CoreError> {
    let index = table.require_column(column)?;
    let needle = needle.to_lowercase();

    Ok(table.retain_rows(|row| contains_folded(&row[index], &needle)))
}

/// Keep rows whose `column` contains `include` and, if given, not `exclude`.
pub fn filter_by_keyword(
    table: &Table,
    column: &str,
    include: &str,
    exclude: Option<&str>,
) -> Result<Table, CoreError> {
    let index = table.require_column(column)?;
    let include = include.to_lowercase();
    let exclude = exclude.map(str::to_lowercase);

    Ok(table.retain_rows(|row| {
        let cell = &row[index];
        contains_folded(cell, &include)
            && exclude.as_deref().is_none_or(|ex| !contains_folded(cell, ex))
    }))
}

/// Project onto the requested columns that exist, in requested order.
///
/// Absent columns are skipped rather than reported: station payloads differ
/// in shape from one dataset to the next.
pub fn select_columns<S: AsRef<str>>(table: &Table, columns: &[S]) -> Table {
    if table.is_empty() {
        return table.clone();
    }

    let indices: Vec<usize> = columns
        .iter()
        .filter_map(|c| table.column_index(c.as_ref()))
        .collect();

    if indices.is_empty() {
        warn!("None of the requested columns exist in the table");
    }

    table.project(&indices)
}

/// Chain filters so each stage feeds the next. No filters is the identity.
pub fn compose(filters: Vec<Box<dyn TableFilter>>) -> FilterChain {
    FilterChain { filters }
}

fn contains_folded(value: &serde_json::Value, folded_needle: &str) -> bool {
    cell_text(value).is_some_and(|text| text.to_lowercase().contains(folded_needle))
}

#[derive(Debug, Clone)]
pub struct TextFilter {
    column: String,
    needle: String,
}

impl TextFilter {
    pub fn new(column: impl Into<String>, needle: impl Into<String>) -> Self {
        Self { column: column.into(), needle: needle.into() }
    }
}

impl TableFilter for TextFilter {
    fn apply(&self, table: &Table) -> Result<Table, CoreError> {
        filter_by_column_text(table, &self.column, &self.needle)
    }

    fn name(&self) -> &str {
        "text"
    }
}

#[derive(Debug, Clone)]
pub struct KeywordFilter {
    column: String,
    include: String,
    exclude: Option<String>,
}

impl KeywordFilter {
    pub fn new(column: impl Into<String>, include: impl Into<String>, exclude: Option<String>) -> Self {
        Self { column: column.into(), include: include.into(), exclude }
    }
}

impl TableFilter for KeywordFilter {
    fn apply(&self, table: &Table) -> Result<Table, CoreError> {
        filter_by_keyword(table, &self.column, &self.include, self.exclude.as_deref())
    }

    fn name(&self) -> &str {
        "keyword"
    }
}

#[derive(Debug, Clone)]
pub struct ColumnSelection {
    columns: Vec<String>,
}

impl ColumnSelection {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }
}

impl TableFilter for ColumnSelection {
    fn apply(&self, table: &Table) -> Result<Table, CoreError> {
        Ok(select_columns(table, &self.columns))
    }

    fn name(&self) -> &str {
        "columns"
    }
}

#[derive(Debug, Default)]
pub struct FilterChain {
    filters: Vec<Box<dyn TableFilter>>,
}

impl FilterChain {
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl TableFilter for FilterChain {
    fn apply(&self, table: &Table) -> Result<Table, CoreError> {
        let mut current = table.clone();
        for filter in &self.filters {
            current = filter.apply(&current)?;
        }
        Ok(current)
    }

    fn name(&self) -> &str {
        "chain"
    }
}

/// Wraps a filter and logs row counts around it.
#[derive(Debug)]
pub struct Logged<F> {
    inner: F,
}

impl<F: TableFilter> Logged<F> {
    pub fn new(inner: F) -> Self {
        Self { inner }
    }
}

impl<F: TableFilter> TableFilter for Logged<F> {
    fn apply(&self, table: &Table) -> Result<Table, CoreError> {
        debug!("Applying {} filter to {} rows", self.inner.name(), table.len());
        let result = self.inner.apply(table)?;
        debug!("{} filter kept {} rows", self.inner.name(), result.len());
        Ok(result)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
