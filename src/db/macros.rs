//! Database dispatch macros for reducing code duplication.
//!
//! This module provides declarative macros that generate database-specific
//! implementations while maintaining linear readability. The macros expand
//! at compile time with zero runtime overhead.

/// Macro for generating database dispatch match arms.
///
/// This macro generates match arms for `DbConnection` variants, reducing the need
/// to manually write repetitive match statements. Arms may carry attributes,
/// so a feature-gated variant gets a `#[cfg(...)]` arm.
///
/// # Example
///
/// ```ignore
/// impl_db_dispatch!(conn, {
///     MySql(c) => do_mysql(c),
///     Postgres(c) => do_postgres(c),
///     SQLite(c) => do_sqlite(c),
///     #[cfg(feature = "mssql")]
///     MsSql(c) => do_mssql(c),
/// });
/// ```
#[macro_export]
macro_rules! impl_db_dispatch {
    ($conn:expr, { $($(#[$meta:meta])* $variant:ident($c:ident) => $body:expr),+ $(,)? }) => {
        match $conn {
            $(
                $(#[$meta])*
                $crate::db::connection::DbConnection::$variant($c) => $body,
            )+
        }
    };
}

pub use impl_db_dispatch;
