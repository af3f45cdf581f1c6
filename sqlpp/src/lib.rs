//! Query rewriting and prepared statement caching on top of a
//! database connection.
//!
//! List arguments are expanded into `IN (...)` placeholders, placeholders
//! are translated into the database's dialect, and statements are prepared
//! once and reused by every caller sharing the [`Db`].

pub mod cli;
pub mod config;
pub mod db;
pub mod driver;
pub mod error;
pub mod logger;
pub mod prepared_statements;
pub mod transform;


pub use config::{Config, Dialect};
pub use db::{scan_rows, Db};
pub use driver::{Arg, Connection, ExecResult, FromValue, Row, Rows, Value};
pub use error::Error;
pub use prepared_statements::StatementCache;
pub use transform::{transform, Transformed};
