//! Forward-only row cursor.
//!
//! A `Cursor` streams decoded rows straight from the driver. It borrows its
//! connection mutably, so nothing else can use the connection until the cursor
//! is dropped or collected.

use crate::db::types::{DecodeRow, decode_row};
use crate::error::{DbError, DbResult};
use crate::models::{ResultSet, Row, Schema};
use futures_util::stream::{self, BoxStream};
use futures_util::{Stream, StreamExt};
use std::pin::Pin;
use std::task::{Context, Poll};

/// A live, forward-only stream of rows.
pub struct Cursor<'c> {
    rows: BoxStream<'c, DbResult<Row>>,
}

impl<'c> Cursor<'c> {
    /// Wrap an already-decoded row stream.
    pub fn new(rows: BoxStream<'c, DbResult<Row>>) -> Self {
        Self { rows }
    }

    /// Decode a driver row stream. The first row fixes the schema for the rest.
    pub fn from_driver<R, E>(rows: BoxStream<'c, Result<R, E>>) -> Self
    where
        R: DecodeRow + Send + 'c,
        DbError: From<E>,
        E: 'c,
    {
        let mut schema: Option<Schema> = None;
        let rows = rows.map(move |row| {
            let row = row.map_err(DbError::from)?;
            decode_row(&row, &mut schema)
        });
        Self::new(rows.boxed())
    }

    /// A cursor over rows that are already in memory.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self::new(stream::iter(rows.into_iter().map(Ok)).boxed())
    }

    /// A cursor whose first read fails with `err`.
    pub fn failed(err: DbError) -> Self {
        Self::new(stream::once(async move { Err(err) }).boxed())
    }

    /// Read the next row, or `None` once the result is exhausted.
    pub async fn next_row(&mut self) -> Option<DbResult<Row>> {
        self.rows.next().await
    }

    /// Read every remaining row into a `ResultSet`.
    ///
    /// An empty result has no columns.
    pub async fn collect(mut self) -> DbResult<ResultSet> {
        let mut rows = Vec::new();
        while let Some(row) = self.rows.next().await {
            rows.push(row?);
        }
        match rows.first() {
            Some(first) => {
                let schema = first.schema().clone();
                Ok(ResultSet::new(schema, rows))
            }
            None => Ok(ResultSet::empty()),
        }
    }
}

impl Stream for Cursor<'_> {
    type Item = DbResult<Row>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rows.poll_next_unpin(cx)
    }
}

impl std::fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor").finish_non_exhaustive()
    }
}
