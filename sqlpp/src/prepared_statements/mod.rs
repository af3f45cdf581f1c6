//! Prepared statements cache.

pub mod cache;

pub use cache::{Entry, Stats, StatementCache};
