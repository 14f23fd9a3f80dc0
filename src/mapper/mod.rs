//! Result mapping.
//!
//! Turns query results into generic rows, per-column lists or typed records.
//!
//! Record mapping resolves every column to the record's setters once per call.
//! A column with no setter, or whose value no setter accepts, is skipped for
//! that row and reported as a [`MappingDiagnostic`]. A value that cannot be
//! decoded, or a record that cannot be created, aborts the whole call with a
//! mapping error. Statement errors raised while reading pass through unchanged.

pub mod binding;

pub use binding::{Binding, FromSqlValue, Record, capitalize, setter_name};

use crate::db::cursor::Cursor;
use crate::error::{DbError, DbResult};
use crate::models::{GenericRow, ResultSet, SqlValue};
use tracing::{debug, warn};

/// Records mapped from a result, plus what could not be applied.
#[derive(Debug)]
pub struct Mapped<T> {
    pub records: Vec<T>,
    pub diagnostics: Vec<MappingDiagnostic>,
}

impl<T> Mapped<T> {
    /// Check if every column of every row was applied.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// A column that was skipped while mapping one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingDiagnostic {
    /// Zero-based row index within the result.
    pub row: usize,
    pub column: String,
    pub kind: DiagnosticKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// The record has no setter for the column.
    MissingSetter { setter: String },
    /// Setters exist but none accepts the value's runtime type.
    TypeMismatch {
        setter: String,
        expected: Vec<&'static str>,
        actual: &'static str,
    },
}

impl std::fmt::Display for MappingDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            DiagnosticKind::MissingSetter { setter } => write!(
                f,
                "row {}: no setter {} for column {}",
                self.row, setter, self.column
            ),
            DiagnosticKind::TypeMismatch {
                setter,
                expected,
                actual,
            } => write!(
                f,
                "row {}: {} expects {} but column {} holds {}",
                self.row,
                setter,
                expected.join(" or "),
                self.column,
                actual
            ),
        }
    }
}

/// Map each row to a name-keyed `GenericRow`.
///
/// A repeated column name overwrites the earlier value in the same row.
pub fn to_generic_rows(result: &ResultSet) -> Vec<GenericRow> {
    result
        .rows()
        .iter()
        .map(|row| {
            let mut generic = GenericRow::with_capacity(row.len());
            for (name, value) in row.iter() {
                generic.insert(name, value.clone());
            }
            generic
        })
        .collect()
}

/// Map each row to its (column name, value) pairs, keeping duplicate names.
pub fn to_column_lists(result: &ResultSet) -> Vec<Vec<(String, SqlValue)>> {
    result
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect()
        })
        .collect()
}

/// Map each row to a new `T`, applying every column through `T`'s setters.
pub fn to_records<T: Record>(result: &ResultSet) -> DbResult<Mapped<T>> {
    let bindings = T::bindings();
    let type_name = std::any::type_name::<T>();

    // Column index -> (setter name, candidate bindings in declaration order)
    let plan: Vec<(String, Vec<&Binding<T>>)> = result
        .columns()
        .iter()
        .map(|col| {
            let setter = setter_name(&col.name);
            let candidates = bindings
                .iter()
                .filter(|b| b.setter_name() == setter)
                .collect();
            (setter, candidates)
        })
        .collect();

    let mut records = Vec::with_capacity(result.row_count());
    let mut diagnostics = Vec::new();

    for (row_idx, row) in result.rows().iter().enumerate() {
        let mut record = T::instantiate().map_err(|e| {
            DbError::mapping_caused_by(format!("Failed to instantiate {}", type_name), e)
        })?;

        for ((name, value), (setter, candidates)) in row.iter().zip(&plan) {
            if candidates.is_empty() {
                warn!(row = row_idx, column = %name, setter = %setter, record = type_name, "No setter for column");
                diagnostics.push(MappingDiagnostic {
                    row: row_idx,
                    column: name.to_string(),
                    kind: DiagnosticKind::MissingSetter {
                        setter: setter.clone(),
                    },
                });
                continue;
            }

            if !candidates.iter().any(|b| b.apply(&mut record, value)) {
                let expected: Vec<&'static str> =
                    candidates.iter().map(|b| b.expected_type()).collect();
                warn!(
                    row = row_idx,
                    column = %name,
                    setter = %setter,
                    actual = value.type_name(),
                    "Setter does not accept column value"
                );
                diagnostics.push(MappingDiagnostic {
                    row: row_idx,
                    column: name.to_string(),
                    kind: DiagnosticKind::TypeMismatch {
                        setter: setter.clone(),
                        expected,
                        actual: value.type_name(),
                    },
                });
            }
        }

        records.push(record);
    }

    debug!(
        record = type_name,
        records = records.len(),
        diagnostics = diagnostics.len(),
        "Mapped result to records"
    );
    Ok(Mapped {
        records,
        diagnostics,
    })
}

/// Read a cursor to the end and map it to generic rows.
pub async fn collect_generic_rows(cursor: Cursor<'_>) -> DbResult<Vec<GenericRow>> {
    let result = cursor.collect().await?;
    Ok(to_generic_rows(&result))
}

/// Read a cursor to the end and map it to records.
pub async fn collect_records<T: Record>(cursor: Cursor<'_>) -> DbResult<Mapped<T>> {
    let result = cursor.collect().await?;
    to_records(&result)
}
