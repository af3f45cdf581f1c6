use serde::{Deserialize, Serialize};
use std::fs::read_to_string;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

use crate::util::{env_enum_or_default, env_list};
use crate::{Dialect, PreparedStatements};

use super::error::Error;

/// Configuration.
///
/// Every setting can be omitted from `sqlpp.toml`, in which case it's
/// taken from the matching `SQLPP_*` environment variable, or its default.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Dialect of the database behind the connection.
    ///
    /// _Default:_ `postgres`
    #[serde(default = "Config::dialect")]
    pub dialect: Dialect,

    /// Prepare and cache statements, or send everything as-is.
    ///
    /// _Default:_ `enabled`
    #[serde(default = "Config::prepared_statements")]
    pub prepared_statements: PreparedStatements,

    /// Driver error message prefixes meaning the statement can't be prepared.
    /// Statements failing with one of these are never prepared again and
    /// run directly instead.
    ///
    /// _Default:_ depends on the dialect.
    #[serde(default = "Config::unsupported_prepare")]
    pub unsupported_prepare: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dialect: Self::dialect(),
            prepared_statements: Self::prepared_statements(),
            unsupported_prepare: Self::unsupported_prepare(),
        }
    }
}

impl Config {
    /// Load configuration from disk or use defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();

        let config = match read_to_string(path) {
            Ok(config) => {
                let config: Config =
                    toml::from_str(&config).map_err(|err| Error::syntax(path, err))?;
                info!("loaded \"{}\"", path.display());
                config
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                warn!(
                    "\"{}\" doesn't exist, loading defaults instead",
                    path.display()
                );
                Config::default()
            }
            Err(err) => return Err(Error::io(path, err)),
        };

        config.check();

        Ok(config)
    }

    /// Configuration with defaults for the given dialect.
    pub fn with_dialect(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Default::default()
        }
    }

    /// Warn about settings that are valid but probably not intended.
    pub fn check(&self) {
        if !self.prepared_statements.enabled() && self.unsupported_prepare.is_some() {
            warn!("unsupported_prepare has no effect while prepared_statements is disabled");
        }

        if let Some(ref signatures) = self.unsupported_prepare {
            if signatures.iter().any(|s| s.is_empty()) {
                warn!("unsupported_prepare contains an empty prefix, every prepare error will be cached");
            }
        }
    }

    /// The driver refused to prepare a statement because the prepared
    /// statement protocol doesn't support it.
    pub fn prepare_not_supported(&self, message: &str) -> bool {
        match self.unsupported_prepare {
            Some(ref signatures) => signatures.iter().any(|s| message.starts_with(s.as_str())),
            None => self
                .dialect
                .unsupported_prepare()
                .iter()
                .any(|s| message.starts_with(s)),
        }
    }

    fn dialect() -> Dialect {
        env_enum_or_default("SQLPP_DIALECT")
    }

    fn prepared_statements() -> PreparedStatements {
        env_enum_or_default("SQLPP_PREPARED_STATEMENTS")
    }

    fn unsupported_prepare() -> Option<Vec<String>> {
        env_list("SQLPP_UNSUPPORTED_PREPARE")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_basic() {
        let source = r#"
dialect = "mysql"
prepared_statements = "disabled"
unsupported_prepare = ["Error 1295:", "Error 1615:"]
"#;

        let config: Config = toml::from_str(source).unwrap();
        assert_eq!(config.dialect, Dialect::MySql);
        assert_eq!(config.prepared_statements, PreparedStatements::Disabled);
        assert_eq!(
            config.unsupported_prepare,
            Some(vec!["Error 1295:".to_string(), "Error 1615:".to_string()])
        );
    }

    #[test]
    fn test_unknown_field() {
        let source = r#"
dialect = "mysql"
pool_size = 5
"#;
        assert!(toml::from_str::<Config>(source).is_err());
    }

    #[test]
    fn test_prepare_not_supported() {
        let mysql = Config {
            dialect: Dialect::MySql,
            prepared_statements: PreparedStatements::Enabled,
            unsupported_prepare: None,
        };
        assert!(mysql.prepare_not_supported(
            "Error 1295: This command is not supported in the prepared statement protocol yet"
        ));
        assert!(!mysql.prepare_not_supported(""));
        assert!(!mysql.prepare_not_supported("Error 1146: Table 'foo' doesn't exist"));

        let postgres = Config {
            dialect: Dialect::Postgres,
            prepared_statements: PreparedStatements::Enabled,
            unsupported_prepare: None,
        };
        assert!(!postgres.prepare_not_supported("Error 1295: not supported"));

        let custom = Config {
            unsupported_prepare: Some(vec!["cannot prepare".into()]),
            ..postgres
        };
        assert!(custom.prepare_not_supported("cannot prepare this statement"));
    }

    #[test]
    fn test_load_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"dialect = \"mysql\"\n").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.dialect, Dialect::MySql);
        assert!(config.prepare_not_supported("Error 1295: nope"));
    }

    #[test]
    fn test_load_syntax_error() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"dialect = \n").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, Error::Syntax { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().join("sqlpp.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_unreadable() {
        let dir = tempfile::tempdir().unwrap();

        // A directory isn't a missing file.
        let err = Config::load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
