//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in a string.
///
/// An unset variable without a default is an error. Bare `$VAR` is left
/// untouched when the value has no `${` at all.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, UnsetVar> {
        std::env::var(var).map(Some).map_err(|_| UnsetVar {
            name: var.to_owned(),
        })
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.name),
    })
}

/// Lookup failure for an unset variable.
struct UnsetVar {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("GITA_TEST_DATA_ROOT", "/srv/gita");
        }
        let result = expand_env("${GITA_TEST_DATA_ROOT}/lt/83.json", "dataset").unwrap();
        assert_eq!(result, "/srv/gita/lt/83.json");
        unsafe {
            std::env::remove_var("GITA_TEST_DATA_ROOT");
        }
    }

    #[test]
    fn test_expand_default_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("GITA_TEST_UNSET_HOST");
        }
        let result = expand_env("${GITA_TEST_UNSET_HOST:-0.0.0.0}", "server.host").unwrap();
        assert_eq!(result, "0.0.0.0");
    }

    #[test]
    fn test_expand_missing_var_names_field() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("GITA_TEST_MISSING");
        }
        let err = expand_env("${GITA_TEST_MISSING}", "server.host").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("GITA_TEST_MISSING"));
        assert!(err.to_string().contains("server.host"));
    }

    #[test]
    fn test_literal_unchanged() {
        assert_eq!(
            expand_env("public/texts/$lang", "dataset").unwrap(),
            "public/texts/$lang"
        );
    }
}
