//! db-rowmap Library
//!
//! Vendor-neutral SQL utilities for MySQL/MariaDB, PostgreSQL and SQLite:
//! open a connection, run queries and updates, control transactions, and map
//! results to generic rows or typed records.

pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod mapper;
pub mod models;

pub use config::Config;
pub use db::{Cursor, DbConnection, Session, SqlConnection, connect};
pub use error::{DbError, DbResult};
pub use mapper::{Mapped, MappingDiagnostic, Record};
pub use models::{ConnectionConfig, GenericRow, ResultSet, Row, SqlValue};
