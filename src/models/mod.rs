//! Data models for db-rowmap.
//!
//! This module re-exports all model types used throughout the crate.

pub mod connection;
pub mod row;
pub mod value;

// Re-export commonly used types
pub use connection::{ConnectionConfig, ConnectionConfigError, DatabaseType, TransactionState};
pub use row::{ColumnMetadata, GenericRow, ResultSet, Row, Schema};
pub use value::SqlValue;
