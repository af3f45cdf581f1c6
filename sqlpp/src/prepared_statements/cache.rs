//! Statement cache.
//!
//! Shared between all callers of a [`crate::Db`].

use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering::Relaxed};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::Config;
use crate::driver::Connection;
use crate::Error;

/// Statement cache statistics.
#[derive(Default, Debug, Clone)]
pub struct Stats {
    /// Cache hits.
    hits: Arc<AtomicUsize>,
    /// Cache misses (statements sent to the connection for preparing).
    misses: Arc<AtomicUsize>,
}

impl Stats {
    pub fn hits(&self) -> usize {
        self.hits.load(Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Relaxed)
    }
}

/// Cached outcome of preparing a query.
#[derive(Debug)]
pub enum Entry<S> {
    /// Prepared statement handle.
    Statement(Arc<S>),
    /// The driver can't prepare this query. It's executed
    /// directly every time and never prepared again.
    Unsupported(Error),
}

impl<S> Clone for Entry<S> {
    fn clone(&self) -> Self {
        match self {
            Self::Statement(statement) => Self::Statement(statement.clone()),
            Self::Unsupported(err) => Self::Unsupported(err.clone()),
        }
    }
}

impl<S> Entry<S> {
    /// Get the prepared statement, if any.
    pub fn statement(&self) -> Option<&Arc<S>> {
        match self {
            Self::Statement(statement) => Some(statement),
            Self::Unsupported(_) => None,
        }
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported(_))
    }
}

/// Prepared statements, keyed by query text.
#[derive(Debug)]
pub struct StatementCache<S> {
    statements: DashMap<String, Entry<S>>,
    config: Arc<Config>,
    stats: Stats,
}

impl<S: Send + Sync + 'static> StatementCache<S> {
    /// Create an empty cache. `config` decides which prepare errors are cached.
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            statements: DashMap::new(),
            config,
            stats: Stats::default(),
        }
    }

    /// Get the prepared statement for a query, preparing it
    /// on the connection if it isn't cached yet.
    ///
    /// Errors meaning the driver can't prepare this query are cached
    /// and returned as [`Entry::Unsupported`]. Any other error is returned
    /// and the next call will try to prepare the query again.
    ///
    /// N.B. There is a race here that allows multiple callers to
    /// prepare the same query. The last one to finish replaces the others
    /// in the cache; their statements stay valid but are never closed by
    /// [`StatementCache::release_all`]. That's better than locking the map
    /// while we wait on the database.
    pub async fn prepare<C>(&self, conn: &C, query: &str) -> Result<Entry<S>, Error>
    where
        C: Connection<Statement = S>,
    {
        if let Some(entry) = self.get(query) {
            self.stats.hits.fetch_add(1, Relaxed);
            return Ok(entry);
        }

        self.stats.misses.fetch_add(1, Relaxed);
        debug!("preparing \"{}\"", query);

        // Prepare without holding a reference into the map.
        let entry = match conn.prepare(query).await {
            Ok(statement) => Entry::Statement(Arc::new(statement)),
            Err(err) if self.unsupported(&err) => {
                warn!(
                    "\"{}\" can't be prepared, it will be executed directly: {}",
                    query, err
                );
                Entry::Unsupported(err)
            }
            Err(err) => return Err(err),
        };

        self.statements.insert(query.to_owned(), entry.clone());

        Ok(entry)
    }

    /// Look up a query without preparing it.
    pub fn get(&self, query: &str) -> Option<Entry<S>> {
        self.statements.get(query).map(|entry| entry.clone())
    }

    /// Close every cached statement and empty the cache.
    ///
    /// Errors closing statements are logged and ignored. Don't call this
    /// while other tasks are using the cache.
    pub async fn release_all<C>(&self, conn: &C) -> usize
    where
        C: Connection<Statement = S>,
    {
        let mut statements = vec![];
        self.statements.retain(|_, entry| {
            if let Entry::Statement(statement) = entry {
                statements.push(statement.clone());
            }
            false
        });
        self.statements.shrink_to_fit();

        for statement in &statements {
            if let Err(err) = conn.close_statement(statement).await {
                warn!("error closing prepared statement: {}", err);
            }
        }

        debug!("released {} prepared statements", statements.len());

        statements.len()
    }

    /// The driver refused to prepare the statement because of
    /// what it is, not because something went wrong.
    pub fn unsupported(&self, err: &Error) -> bool {
        match err {
            Error::Driver(message) => self.config.prepare_not_supported(message),
            _ => false,
        }
    }

    /// Number of cached queries, including the ones that can't be prepared.
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// True if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of cached prepared statements.
    pub fn len_prepared(&self) -> usize {
        self.statements
            .iter()
            .filter(|entry| !entry.is_unsupported())
            .count()
    }

    /// Get cache stats.
    pub fn stats(&self) -> Stats {
        self.stats.clone()
    }
}
