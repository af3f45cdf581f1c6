//! Configuration.

use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;
use once_cell::sync::Lazy;
use tracing::info;

pub use sqlpp_config::{Config, Dialect, Error, PreparedStatements};

static CONFIG: Lazy<ArcSwap<Config>> = Lazy::new(|| ArcSwap::from_pointee(Config::default()));

/// Load configuration.
pub fn config() -> Arc<Config> {
    CONFIG.load().clone()
}

/// Load the configuration file from disk.
pub fn load(path: impl AsRef<Path>) -> Result<Arc<Config>, Error> {
    let config = Config::load(path)?;
    Ok(set(config))
}

/// Replace the global configuration. Handles created
/// before this keep the configuration they were created with.
pub fn set(config: Config) -> Arc<Config> {
    info!(
        "dialect is {}, prepared statements are {}",
        config.dialect, config.prepared_statements
    );

    let config = Arc::new(config);
    CONFIG.store(config.clone());
    config
}
