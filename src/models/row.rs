//! Row and result data models.
//!
//! A `ResultSet` is a fully materialized query result: one shared schema and
//! the rows in the order the engine returned them.

use crate::models::SqlValue;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    pub name: String,
    /// Database-specific type (e.g., "int8", "varchar", "TEXT")
    pub type_name: String,
}

impl ColumnMetadata {
    /// Create new column metadata.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// Column list shared by every row of one result.
pub type Schema = Arc<[ColumnMetadata]>;

/// One record: ordered (column name, value) pairs.
///
/// Column names are not guaranteed unique.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Schema,
    values: Vec<SqlValue>,
}

impl Row {
    /// Build a row.
    ///
    /// # Panics
    ///
    /// Panics when the value count does not match the schema.
    pub fn new(columns: Schema, values: Vec<SqlValue>) -> Self {
        assert_eq!(
            columns.len(),
            values.len(),
            "row has {} values for {} columns",
            values.len(),
            columns.len()
        );
        Self { columns, values }
    }

    pub fn columns(&self) -> &[ColumnMetadata] {
        &self.columns
    }

    pub fn schema(&self) -> &Schema {
        &self.columns
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at a zero-based column index.
    pub fn get_index(&self, idx: usize) -> Option<&SqlValue> {
        self.values.get(idx)
    }

    /// Value of the named column. With duplicate names the last column wins,
    /// matching the generic-row representation.
    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .rposition(|c| c.name == name)
            .map(|idx| &self.values[idx])
    }

    /// Iterate (column name, value) pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.columns
            .iter()
            .map(|c| c.name.as_str())
            .zip(self.values.iter())
    }
}

/// A fully materialized query result.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    columns: Schema,
    rows: Vec<Row>,
}

impl ResultSet {
    pub fn new(columns: Schema, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// A result with no columns and no rows.
    pub fn empty() -> Self {
        Self {
            columns: Arc::from(Vec::new()),
            rows: Vec::new(),
        }
    }

    /// Build a result from column names and row values. Column types are reported as "unknown".
    ///
    /// Panics when a row's value count does not match the names.
    pub fn from_values<I, S>(names: I, rows: Vec<Vec<SqlValue>>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Schema = names
            .into_iter()
            .map(|n| ColumnMetadata::new(n, "unknown"))
            .collect();
        let rows = rows
            .into_iter()
            .map(|values| Row::new(Arc::clone(&columns), values))
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[ColumnMetadata] {
        &self.columns
    }

    pub fn schema(&self) -> &Schema {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Get the number of rows in the result.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if the result is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A row keyed by column name, in schema order.
///
/// Inserting a name that is already present overwrites the earlier value in
/// place. Results with duplicate column names therefore lose data here; use
/// per-column lists when every column is needed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenericRow {
    entries: Vec<(String, SqlValue)>,
}

impl GenericRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Insert a value, returning the value it replaced.
    pub fn insert(&mut self, name: impl Into<String>, value: SqlValue) -> Option<SqlValue> {
        let name = name.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Convert to a JSON object, keeping column order.
    pub fn to_json(&self) -> serde_json::Map<String, JsonValue> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect()
    }
}

impl<'a> IntoIterator for &'a GenericRow {
    type Item = &'a (String, SqlValue);
    type IntoIter = std::slice::Iter<'a, (String, SqlValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
