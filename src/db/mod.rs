//! Database abstraction layer.
//!
//! This module provides database access functionality:
//! - Single driver connections behind the `SqlConnection` trait
//! - SQL Server through tiberius (`mssql` feature)
//! - Row cursors
//! - Type mappings
//! - Database dispatch macros for reducing code duplication
//! - Sessions with auto-commit and transaction control

pub mod connection;
pub mod cursor;
#[macro_use]
pub mod macros;
#[cfg(feature = "mssql")]
pub mod mssql;
pub mod session;
pub mod types;

pub use connection::{DbConnection, SqlConnection, connect};
pub use cursor::Cursor;
pub use session::Session;
