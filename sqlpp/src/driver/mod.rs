//! Database driver interface.
//!
//! sqlpp doesn't talk to databases itself. It rewrites queries and caches
//! prepared statements on top of a [`Connection`] supplied by the caller.

use async_trait::async_trait;

use crate::Error;

pub mod row;
pub mod value;

pub use row::{FromValue, Row};
pub use value::{Arg, Value};

/// Result of executing a statement that doesn't return rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecResult {
    pub rows_affected: u64,
    pub last_insert_id: Option<u64>,
}

impl ExecResult {
    pub fn new(rows_affected: u64) -> Self {
        Self {
            rows_affected,
            last_insert_id: None,
        }
    }
}

/// Connection to a database.
///
/// Methods taking `Option<&Self::Statement>` run the query through the
/// prepared statement if one is given, or send the query text directly
/// otherwise.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Prepared statement handle.
    type Statement: Send + Sync + 'static;
    /// Row cursor.
    type Rows: Rows;

    /// Prepare a statement.
    async fn prepare(&self, query: &str) -> Result<Self::Statement, Error>;

    /// Execute a statement that doesn't return rows.
    async fn execute(
        &self,
        statement: Option<&Self::Statement>,
        query: &str,
        args: &[Value],
    ) -> Result<ExecResult, Error>;

    /// Run a query returning rows. `None` means the driver
    /// didn't produce a cursor.
    async fn query(
        &self,
        statement: Option<&Self::Statement>,
        query: &str,
        args: &[Value],
    ) -> Result<Option<Self::Rows>, Error>;

    /// Release a prepared statement.
    async fn close_statement(&self, statement: &Self::Statement) -> Result<(), Error>;

    /// Close the connection.
    async fn close(&self) -> Result<(), Error>;
}

/// Cursor over the rows returned by a query.
///
/// The cursor releases its resources once [`Rows::next`] returns `false`.
#[async_trait]
pub trait Rows: Send {
    /// Move to the next row. Returns `false` when there are no more rows.
    async fn next(&mut self) -> Result<bool, Error>;

    /// The row the cursor is on.
    fn row(&self) -> &Row;

    /// Close the cursor before reaching the end.
    async fn close(&mut self) -> Result<(), Error>;
}
