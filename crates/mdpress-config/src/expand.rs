//! `${VAR}` expansion for configuration values.

use std::path::{Path, PathBuf};

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// Values without `${` are returned as-is, so a bare `$` (as in a LaTeX font
/// name or a shell-style path) never triggers expansion.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |name| std::env::var(name).map(Some))
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })
}

/// Expand a path value; paths that are not valid UTF-8 are left alone.
pub(crate) fn expand_path(path: &Path, field: &str) -> Result<PathBuf, ConfigError> {
    match path.to_str() {
        Some(s) => expand_env(s, field).map(PathBuf::from),
        None => Ok(path.to_path_buf()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_set_var() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("MDPRESS_TEST_EXPAND_SET", "/opt/bin");
        }
        let result = expand_env("${MDPRESS_TEST_EXPAND_SET}/mmdc", "diagrams.command").unwrap();
        assert_eq!(result, "/opt/bin/mmdc");
        unsafe {
            std::env::remove_var("MDPRESS_TEST_EXPAND_SET");
        }
    }

    #[test]
    fn test_expand_default_when_unset() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("MDPRESS_TEST_EXPAND_UNSET");
        }
        let result = expand_env("${MDPRESS_TEST_EXPAND_UNSET:-pandoc}", "export.pandoc").unwrap();
        assert_eq!(result, "pandoc");
    }

    #[test]
    fn test_expand_missing_var_names_field() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("MDPRESS_TEST_EXPAND_MISSING");
        }
        let err = expand_env("${MDPRESS_TEST_EXPAND_MISSING}", "server.host").unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("MDPRESS_TEST_EXPAND_MISSING"));
        assert!(err.to_string().contains("server.host"));
    }

    #[test]
    fn test_bare_dollar_untouched() {
        assert_eq!(expand_env("$HOME/x", "f").unwrap(), "$HOME/x");
        assert_eq!(expand_env("plain", "f").unwrap(), "plain");
    }

    #[test]
    fn test_expand_path() {
        assert_eq!(
            expand_path(Path::new("filters/diagram.lua"), "export.lua_filter").unwrap(),
            PathBuf::from("filters/diagram.lua")
        );
    }
}
