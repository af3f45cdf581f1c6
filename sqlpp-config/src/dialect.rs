use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// MySQL error returned when a statement can't go through
/// the binary (prepared) protocol, e.g. some `SHOW` or DDL commands.
pub const MYSQL_PREPARE_NOT_SUPPORTED: &str = "Error 1295:";

/// SQL dialect spoken by the database behind the connection.
///
/// Decides what placeholders look like in the rewritten query
/// and which driver errors mean "this can't be prepared".
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// Numbered placeholders: `$1`, `$2`, ...
    #[default]
    Postgres,
    /// Repeated `?` placeholders.
    #[serde(rename = "mysql")]
    MySql,
}

impl Dialect {
    /// Placeholders are numbered instead of repeated.
    pub fn numbered_placeholders(&self) -> bool {
        matches!(self, Self::Postgres)
    }

    /// Error message prefixes the driver returns when a statement
    /// shape isn't supported by the prepared statement protocol.
    pub fn unsupported_prepare(&self) -> &'static [&'static str] {
        match self {
            Self::Postgres => &[],
            Self::MySql => &[MYSQL_PREPARE_NOT_SUPPORTED],
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Postgres => write!(f, "postgres"),
            Self::MySql => write!(f, "mysql"),
        }
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "mysql" | "mariadb" => Ok(Self::MySql),
            _ => Err(format!("Invalid dialect: {}", s)),
        }
    }
}
