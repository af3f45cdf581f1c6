//! Environment variable helpers used for config defaults.

use std::env;
use std::str::FromStr;

/// Parse an environment variable, falling back to the type's default
/// if it's not set or doesn't parse.
pub fn env_enum_or_default<T: FromStr + Default>(env_var: &str) -> T {
    env::var(env_var)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_default()
}

/// Comma-separated list from an environment variable.
/// Empty entries are dropped.
pub fn env_list(env_var: &str) -> Option<Vec<String>> {
    env::var(env_var).ok().map(|v| {
        v.split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_env_helpers() {
        env::set_var("SQLPP_TEST_UTIL_FLAG", "true");
        env::set_var("SQLPP_TEST_UTIL_BAD", "maybe");
        env::set_var("SQLPP_TEST_UTIL_LIST", "Error 1295:, ,ERROR 42P05");

        assert!(env_enum_or_default::<bool>("SQLPP_TEST_UTIL_FLAG"));
        assert!(!env_enum_or_default::<bool>("SQLPP_TEST_UTIL_BAD"));
        assert!(!env_enum_or_default::<bool>("SQLPP_TEST_UTIL_MISSING"));
        assert_eq!(
            env_list("SQLPP_TEST_UTIL_LIST").unwrap(),
            vec!["Error 1295:".to_string(), "ERROR 42P05".to_string()]
        );
        assert!(env_list("SQLPP_TEST_UTIL_MISSING").is_none());

        env::remove_var("SQLPP_TEST_UTIL_FLAG");
        env::remove_var("SQLPP_TEST_UTIL_BAD");
        env::remove_var("SQLPP_TEST_UTIL_LIST");
    }
}
