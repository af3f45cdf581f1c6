//! Query entry points.
//!
//! Every call goes through the same steps: rewrite the query and its
//! arguments, get the prepared statement from the cache (preparing it if
//! needed), then run it. Queries the driver refuses to prepare are sent
//! as-is instead, which callers can't tell apart from the prepared path.

use std::sync::Arc;
use tracing::debug;

use crate::config::{self, Config, Dialect};
use crate::driver::{Arg, Connection, ExecResult, Row, Rows};
use crate::prepared_statements::{Entry, StatementCache};
use crate::transform::{transform, Transformed};
use crate::Error;

/// Database handle wrapping a connection.
///
/// Safe to share between tasks: all methods take `&self`.
pub struct Db<C: Connection> {
    conn: C,
    config: Arc<Config>,
    cache: StatementCache<C::Statement>,
}

impl<C: Connection + std::fmt::Debug> std::fmt::Debug for Db<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db")
            .field("conn", &self.conn)
            .field("config", &self.config)
            .field("statements", &self.cache.len())
            .finish()
    }
}

impl<C: Connection> Db<C> {
    /// Wrap a connection.
    pub fn new(conn: C, config: Config) -> Self {
        Self::with_config(conn, Arc::new(config))
    }

    /// Wrap a connection to a PostgreSQL database.
    pub fn postgres(conn: C) -> Self {
        Self::new(conn, Config::with_dialect(Dialect::Postgres))
    }

    /// Wrap a connection to a MySQL database.
    pub fn mysql(conn: C) -> Self {
        Self::new(conn, Config::with_dialect(Dialect::MySql))
    }

    /// Wrap a connection using the global configuration.
    pub fn from_config(conn: C) -> Self {
        Self::with_config(conn, config::config())
    }

    fn with_config(conn: C, config: Arc<Config>) -> Self {
        Self {
            conn,
            cache: StatementCache::new(config.clone()),
            config,
        }
    }

    /// Build a list of arguments. Same as [`crate::args!`].
    pub fn args(&self, args: Vec<Arg>) -> Vec<Arg> {
        args
    }

    /// Rewrite a query for this database.
    pub fn transform(
        &self,
        query: &str,
        args: impl IntoIterator<Item = Arg>,
    ) -> Result<Transformed, Error> {
        transform(self.config.dialect, query, args)
    }

    /// Execute a statement that doesn't return rows.
    pub async fn execute(&self, query: &str, args: Vec<Arg>) -> Result<ExecResult, Error> {
        let Transformed { query, args } = self.transform(query, args)?;
        let statement = self.statement(&query).await?;

        self.conn.execute(statement.as_deref(), &query, &args).await
    }

    /// Fetch the first row returned by a query.
    ///
    /// Returns [`Error::NoRows`] if the query didn't return anything.
    pub async fn query_row(&self, query: &str, args: Vec<Arg>) -> Result<Row, Error> {
        let mut rows = self.rows(query, args).await?.ok_or(Error::NilRows)?;

        match rows.next().await {
            Ok(true) => {
                let row = rows.row().clone();
                rows.close().await?;
                Ok(row)
            }
            Ok(false) => Err(Error::NoRows),
            Err(err) => {
                close_quietly(&mut rows).await;
                Err(err)
            }
        }
    }

    /// Run a query and convert every row it returns with `scanner`.
    pub async fn query<T, S>(&self, query: &str, args: Vec<Arg>, scanner: S) -> Result<Vec<T>, Error>
    where
        T: Send,
        S: FnMut(&Row) -> Result<T, Error> + Send,
    {
        let rows = self.rows(query, args).await?;
        scan_rows(rows, Some(scanner)).await
    }

    /// Close all prepared statements and the connection.
    pub async fn close(&self) -> Result<(), Error> {
        self.cache.release_all(&self.conn).await;
        self.conn.close().await
    }

    /// Statement cache.
    pub fn cache(&self) -> &StatementCache<C::Statement> {
        &self.cache
    }

    /// The wrapped connection.
    pub fn connection(&self) -> &C {
        &self.conn
    }

    /// Configuration used by this handle.
    pub fn config(&self) -> &Config {
        &self.config
    }

    async fn rows(&self, query: &str, args: Vec<Arg>) -> Result<Option<C::Rows>, Error> {
        let Transformed { query, args } = self.transform(query, args)?;
        let statement = self.statement(&query).await?;

        self.conn.query(statement.as_deref(), &query, &args).await
    }

    /// Prepared statement for the query, or `None` if it should be sent as-is.
    async fn statement(&self, query: &str) -> Result<Option<Arc<C::Statement>>, Error> {
        if !self.config.prepared_statements.enabled() {
            return Ok(None);
        }

        match self.cache.prepare(&self.conn, query).await? {
            Entry::Statement(statement) => Ok(Some(statement)),
            Entry::Unsupported(_) => {
                debug!("executing \"{}\" without preparing", query);
                Ok(None)
            }
        }
    }
}

/// Convert every row with `scanner`.
///
/// If the scanner or the cursor fails, the cursor is closed and the error
/// returned; rows scanned so far are dropped. Otherwise the cursor is read to the end,
/// which closes it.
pub async fn scan_rows<R, T, S>(rows: Option<R>, scanner: Option<S>) -> Result<Vec<T>, Error>
where
    R: Rows,
    T: Send,
    S: FnMut(&Row) -> Result<T, Error> + Send,
{
    let (mut rows, mut scanner) = match (rows, scanner) {
        (None, _) => return Err(Error::NilRows),
        (_, None) => return Err(Error::NilScanner),
        (Some(rows), Some(scanner)) => (rows, scanner),
    };

    let mut results = vec![];
    loop {
        match rows.next().await {
            Ok(true) => (),
            Ok(false) => break,
            Err(err) => {
                close_quietly(&mut rows).await;
                return Err(err);
            }
        }

        match scanner(rows.row()) {
            Ok(scanned) => results.push(scanned),
            Err(err) => {
                close_quietly(&mut rows).await;
                return Err(err);
            }
        }
    }

    Ok(results)
}

/// Close a cursor we're abandoning because of another error.
async fn close_quietly<R: Rows>(rows: &mut R) {
    if let Err(err) = rows.close().await {
        debug!("error closing rows: {}", err);
    }
}
