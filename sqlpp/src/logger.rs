//! Logging.

use std::io::IsTerminal;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global logger.
///
/// Log level is controlled with `RUST_LOG`, INFO by default.
/// Output is colored when stderr is a terminal.
pub fn init() {
    let format = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_file(false);

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    // Ignore the error if a logger is already installed, e.g. by the application.
    let _ = tracing_subscriber::registry()
        .with(format)
        .with(filter)
        .try_init();
}
