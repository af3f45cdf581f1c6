use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Use of prepared statements.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Copy)]
#[serde(rename_all = "snake_case")]
pub enum PreparedStatements {
    /// Every query is sent to the connection as-is, nothing is cached.
    Disabled,
    /// Queries are prepared once and the statements are cached.
    #[default]
    Enabled,
}

impl PreparedStatements {
    pub fn enabled(&self) -> bool {
        !matches!(self, PreparedStatements::Disabled)
    }
}

impl std::fmt::Display for PreparedStatements {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disabled => write!(f, "disabled"),
            Self::Enabled => write!(f, "enabled"),
        }
    }
}

impl FromStr for PreparedStatements {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "disabled" | "off" | "false" => Ok(Self::Disabled),
            "enabled" | "on" | "true" => Ok(Self::Enabled),
            _ => Err(format!("Invalid prepared statements mode: {}", s)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_prepared_statements_from_str() {
        assert_eq!(
            "Disabled".parse::<PreparedStatements>().unwrap(),
            PreparedStatements::Disabled
        );
        assert!("on".parse::<PreparedStatements>().unwrap().enabled());
        assert!("sometimes".parse::<PreparedStatements>().is_err());
    }
}
