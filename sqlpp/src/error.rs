//! sqlpp errors.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Error returned by the database driver, passed through as-is.
    #[error("{0}")]
    Driver(String),

    #[error("list argument {position} has no matching \"(?)\" in the query ({markers} found)")]
    UnmatchedList { position: usize, markers: usize },

    #[error("sqlpp: nil rows")]
    NilRows,

    #[error("sqlpp: nil scanner")]
    NilScanner,

    #[error("sqlpp: no rows in result set")]
    NoRows,

    #[error("column {0} is out of range")]
    Column(usize),

    #[error("column {column} can't be read as {expected}")]
    Type {
        column: usize,
        expected: &'static str,
    },
}

impl Error {
    /// Wrap a driver error.
    pub fn driver(err: impl ToString) -> Self {
        Self::Driver(err.to_string())
    }

    /// Error came from the database driver.
    pub fn is_driver(&self) -> bool {
        matches!(self, Self::Driver(_))
    }
}
