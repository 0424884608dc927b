//! `${VAR}` expansion for profile values.
//!
//! Lets a profile reference secrets kept in the environment, e.g.
//! `pat = "${CONFLUENCE_TOKEN}"`.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in a profile value.
///
/// Values without `${` are returned unchanged, so bare `$` characters in
/// tokens or URLs survive.
pub(crate) fn expand_env(value: &str, key: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| std::env::var(var).map(Some))
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            key: key.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_token_from_env() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("CFL_TEST_TOKEN", "abc123");
        }
        assert_eq!(expand_env("${CFL_TEST_TOKEN}", "pat").unwrap(), "abc123");
        unsafe {
            std::env::remove_var("CFL_TEST_TOKEN");
        }
    }

    #[test]
    fn test_expand_default_when_unset() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("CFL_TEST_UNSET_HOST");
        }
        let url = expand_env("https://${CFL_TEST_UNSET_HOST:-wiki.local}/wiki", "base_url").unwrap();
        assert_eq!(url, "https://wiki.local/wiki");
    }

    #[test]
    fn test_expand_missing_var_names_key() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("CFL_TEST_MISSING");
        }
        let err = expand_env("${CFL_TEST_MISSING}", "pat").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("CFL_TEST_MISSING"));
        assert!(err.to_string().contains("pat"));
    }

    #[test]
    fn test_bare_dollar_kept() {
        assert_eq!(expand_env("tok$en", "pat").unwrap(), "tok$en");
    }
}
