//! Database session: the one generic utility over every supported vendor.
//!
//! A `Session` owns a single connection and tracks its auto-commit mode.
//! Leaving auto-commit opens a transaction with the vendor's begin statement;
//! `commit` and `rollback` end it and always put the session back into
//! auto-commit mode, even when the server rejects the statement.

use crate::db::connection::{DbConnection, SqlConnection, connect};
use crate::db::cursor::Cursor;
use crate::error::{DbError, DbResult};
use crate::mapper::{self, Mapped, Record};
use crate::models::{ConnectionConfig, DatabaseType, GenericRow, ResultSet, TransactionState};
use tracing::{debug, error, info, warn};

const COMMIT: &str = "COMMIT";
const ROLLBACK: &str = "ROLLBACK";

/// A connection plus its transaction mode.
#[derive(Debug)]
pub struct Session<C: SqlConnection = DbConnection> {
    conn: C,
    auto_commit: bool,
}

impl Session<DbConnection> {
    /// Connect and wrap the new connection in a session.
    pub async fn open(config: &ConnectionConfig) -> DbResult<Self> {
        Ok(Self::new(connect(config).await?))
    }
}

impl<C: SqlConnection> Session<C> {
    /// Wrap an open connection. The session starts in auto-commit mode.
    pub fn new(conn: C) -> Self {
        Self {
            conn,
            auto_commit: true,
        }
    }

    pub fn db_type(&self) -> DatabaseType {
        self.conn.db_type()
    }

    pub fn connection(&self) -> &C {
        &self.conn
    }

    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.conn
    }

    /// Run a query and return a live cursor over its rows.
    ///
    /// Blank SQL is never sent; the cursor's first read fails instead.
    pub fn execute_query<'c>(&'c mut self, sql: &'c str) -> Cursor<'c> {
        match check_sql(sql) {
            Ok(()) => self.conn.fetch(sql),
            Err(e) => Cursor::failed(e),
        }
    }

    /// Run a query and read the whole result.
    pub async fn query(&mut self, sql: &str) -> DbResult<ResultSet> {
        let result = self.execute_query(sql).collect().await?;
        debug!(row_count = result.row_count(), "Query completed");
        Ok(result)
    }

    /// Run a query and map every row to a `GenericRow`.
    pub async fn query_generic(&mut self, sql: &str) -> DbResult<Vec<GenericRow>> {
        mapper::collect_generic_rows(self.execute_query(sql)).await
    }

    /// Run a query and map every row to a `T`.
    pub async fn query_records<T: Record>(&mut self, sql: &str) -> DbResult<Mapped<T>> {
        mapper::collect_records(self.execute_query(sql)).await
    }

    /// Run an INSERT, UPDATE, DELETE or DDL statement; returns the affected row count.
    pub async fn execute_update(&mut self, sql: &str) -> DbResult<u64> {
        check_sql(sql)?;
        self.conn.execute(sql).await
    }

    pub fn is_auto_commit(&self) -> bool {
        self.auto_commit
    }

    pub fn transaction_state(&self) -> TransactionState {
        if self.auto_commit {
            TransactionState::AutoCommit
        } else {
            TransactionState::Active
        }
    }

    /// Switch auto-commit mode.
    ///
    /// Turning it off opens a transaction. Turning it back on commits the open
    /// transaction. Setting the current mode again does nothing.
    pub async fn set_auto_commit(&mut self, auto_commit: bool) -> DbResult<()> {
        match (self.auto_commit, auto_commit) {
            (true, false) => {
                let begin = self.db_type().begin_statement();
                self.conn.execute(begin).await?;
                self.auto_commit = false;
                debug!(db_type = %self.db_type(), "Transaction started");
                Ok(())
            }
            (false, true) => self.finish(COMMIT).await,
            _ => Ok(()),
        }
    }

    /// Commit the open transaction and return to auto-commit mode.
    pub async fn commit(&mut self) -> DbResult<()> {
        self.finish(COMMIT).await
    }

    /// Roll back the open transaction and return to auto-commit mode.
    pub async fn rollback(&mut self) -> DbResult<()> {
        self.finish(ROLLBACK).await
    }

    async fn finish(&mut self, statement: &'static str) -> DbResult<()> {
        if self.auto_commit {
            return Err(DbError::transaction(format!(
                "Cannot {} in auto-commit mode: no transaction is open",
                statement
            )));
        }

        let result = self.conn.execute(statement).await;
        self.auto_commit = true;

        match result {
            Ok(_) => {
                info!(statement, "Transaction finished");
                Ok(())
            }
            Err(e) => {
                warn!(statement, error = %e, "Transaction end failed; session reset to auto-commit");
                Err(e)
            }
        }
    }

    /// Close the connection. Failures are logged, never returned.
    pub async fn close(self) {
        if !self.auto_commit {
            warn!("Closing session with an open transaction; the server discards it");
        }
        match self.conn.close().await {
            Ok(()) => debug!("Connection closed"),
            Err(e) => error!(error = %e, "Failed to close connection"),
        }
    }

    /// Give back the connection, dropping the session's mode tracking.
    pub fn into_inner(self) -> C {
        self.conn
    }
}

fn check_sql(sql: &str) -> DbResult<()> {
    if sql.trim().is_empty() {
        return Err(DbError::invalid_input("SQL statement is empty"));
    }
    Ok(())
}
