use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::config::{Config, Dialect};
use crate::driver::{Arg, Value};
use crate::transform::{transform, Transformed};

/// sqlpp rewrites queries with list arguments and caches prepared statements.
#[derive(Parser, Debug)]
#[command(name = "sqlpp", version)]
pub struct Cli {
    /// Path to the configuration file. Default: "sqlpp.toml"
    #[arg(short, long, default_value = "sqlpp.toml")]
    pub config: PathBuf,
    /// Subcommand.
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Rewrite a query and print it with its arguments.
    Transform {
        /// Query text.
        #[arg(short, long)]
        query: String,

        /// Arguments as a JSON array, e.g. '["i", [1, 2], "k"]'.
        #[arg(short, long, default_value = "[]")]
        args: String,

        /// Dialect to rewrite for. Default: the configured one.
        #[arg(short, long)]
        dialect: Option<Dialect>,
    },

    /// Check the configuration file for errors.
    Configcheck,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("args: {0}")]
    Json(#[from] serde_json::Error),

    #[error("args must be a JSON array")]
    NotArray,

    #[error("argument {0}: only scalars and lists of scalars are supported")]
    Nested(usize),

    #[error("{0}")]
    Sqlpp(#[from] crate::Error),
}

/// Rewrite a query, taking arguments as a JSON array.
pub fn transform_json(dialect: Dialect, query: &str, args: &str) -> Result<Transformed, CliError> {
    let args = json_args(args)?;
    Ok(transform(dialect, query, args)?)
}

/// Rewrite a query and print the result.
#[allow(clippy::print_stdout)]
pub fn print_transform(dialect: Dialect, query: &str, args: &str) -> Result<(), CliError> {
    let transformed = transform_json(dialect, query, args)?;
    println!("{}", transformed.query);
    println!("{}", serde_json::to_string(&transformed.args)?);
    Ok(())
}

/// Parse query arguments from a JSON array.
///
/// Arrays become list arguments, everything else is a scalar.
pub fn json_args(args: &str) -> Result<Vec<Arg>, CliError> {
    let serde_json::Value::Array(args) = serde_json::from_str(args)? else {
        return Err(CliError::NotArray);
    };

    args.into_iter()
        .enumerate()
        .map(|(position, arg)| match arg {
            serde_json::Value::Array(list) => list
                .into_iter()
                .map(|value| json_value(value).ok_or(CliError::Nested(position)))
                .collect::<Result<Vec<_>, _>>()
                .map(Arg::List),
            value => json_value(value)
                .map(Arg::Scalar)
                .ok_or(CliError::Nested(position)),
        })
        .collect()
}

fn json_value(value: serde_json::Value) -> Option<Value> {
    use serde_json::Value as Json;

    match value {
        Json::Null => Some(Value::Null),
        Json::Bool(b) => Some(Value::Bool(b)),
        Json::Number(n) => n
            .as_i64()
            .map(Value::Int)
            .or_else(|| n.as_u64().map(Value::UInt))
            .or_else(|| n.as_f64().map(Value::Float)),
        Json::String(s) => Some(Value::Text(s)),
        Json::Array(_) | Json::Object(_) => None,
    }
}

#[derive(Debug, Error)]
pub enum ConfigCheckError {
    #[error("I/O error on `{0}`: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("TOML parse error in `{0}`: {1}")]
    Parse(PathBuf, #[source] toml::de::Error),
}

/// Confirm that the configuration file is valid.
pub fn config_check(path: &Path) -> Result<Config, ConfigCheckError> {
    let source =
        read_to_string(path).map_err(|e| ConfigCheckError::Io(path.to_path_buf(), e))?;
    let config = toml::from_str::<Config>(&source)
        .map_err(|e| ConfigCheckError::Parse(path.to_path_buf(), e))?;
    config.check();

    Ok(config)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_transform_json() {
        let transformed = transform_json(
            Dialect::Postgres,
            "select a,b from foo where i = ? and j in (?) or k = ?",
            r#"["i", [1, 2], "k"]"#,
        )
        .unwrap();

        assert_eq!(
            transformed.query,
            "select a,b from foo where i = $1 and j in ($2,$3) or k = $4"
        );
        assert_eq!(
            serde_json::to_string(&transformed.args).unwrap(),
            r#"["i",1,2,"k"]"#
        );
    }

    #[test]
    fn test_json_args() {
        let args = json_args(r#"[null, true, -1, 18446744073709551615, 1.5, "s", []]"#).unwrap();
        assert_eq!(
            args,
            vec![
                Arg::Scalar(Value::Null),
                Arg::Scalar(Value::Bool(true)),
                Arg::Scalar(Value::Int(-1)),
                Arg::Scalar(Value::UInt(u64::MAX)),
                Arg::Scalar(Value::Float(1.5)),
                Arg::Scalar(Value::Text("s".into())),
                Arg::List(vec![]),
            ]
        );

        assert!(matches!(json_args("{}"), Err(CliError::NotArray)));
        assert!(matches!(json_args("[[[1]]]"), Err(CliError::Nested(0))));
        assert!(matches!(json_args(r#"[1, {"a": 1}]"#), Err(CliError::Nested(1))));
        assert!(matches!(json_args("[1,"), Err(CliError::Json(_))));
    }

    #[test]
    fn test_config_check() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"dialect = \"mysql\"\nprepared_statements = \"disabled\"\n")
            .unwrap();
        let config = config_check(file.path()).unwrap();
        assert_eq!(config.dialect, Dialect::MySql);

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"dialect = \"oracle\"\n").unwrap();
        assert!(matches!(
            config_check(file.path()),
            Err(ConfigCheckError::Parse(_, _))
        ));

        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            config_check(&dir.path().join("missing.toml")),
            Err(ConfigCheckError::Io(_, _))
        ));
    }
}
