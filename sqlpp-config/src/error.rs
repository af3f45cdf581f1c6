//! Configuration errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("\"{path}\": {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("\"{path}\": {source}")]
    Syntax {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl Error {
    /// File exists but couldn't be read.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Parse error attributed to a file on disk.
    pub fn syntax(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::Syntax {
            path: path.into(),
            source,
        }
    }
}
