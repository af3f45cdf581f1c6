// Submodules
pub mod core;
pub mod dialect;
pub mod error;
pub mod prepared;
pub mod util;

pub use core::Config;
pub use dialect::Dialect;
pub use error::Error;
pub use prepared::PreparedStatements;
