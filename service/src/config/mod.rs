//! Configuration loading
//!
//! Reads [`SheetMetaConfig`] from YAML with `${VAR}` / `${VAR:-default}`
//! environment substitution, then validates it.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use sheetmeta_core::config::SheetMetaConfig;
use sheetmeta_core::error::{Result, SheetMetaError};
use std::env;
use std::path::Path;
use tracing::{debug, warn};

static ENV_VAR: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"\$\{([^}:]+)(?::(-)?([^}]*))?\}").ok());

/// Load and validate a configuration file
///
/// # Errors
///
/// Returns `SheetMetaError::IoError` if the file cannot be read and
/// `SheetMetaError::ConfigError` if it does not parse or validate.
pub fn load_config(path: &Path) -> Result<SheetMetaConfig> {
    let contents = std::fs::read_to_string(path)?;
    let config = parse_config(&contents)?;
    debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}

/// Parse and validate configuration text
///
/// Blank input yields the defaults.
pub fn parse_config(contents: &str) -> Result<SheetMetaConfig> {
    let substituted = substitute_env_vars(contents);
    let config = if substituted.trim().is_empty() {
        SheetMetaConfig::default()
    } else {
        serde_yaml::from_str(&substituted)
            .map_err(|e| SheetMetaError::config(format!("Failed to parse YAML config: {e}")))?
    };
    config.validate()?;
    Ok(config)
}

/// Load `path` when given, defaults otherwise
pub fn load_or_default(path: Option<&Path>) -> Result<SheetMetaConfig> {
    match path {
        Some(path) => load_config(path),
        None => Ok(SheetMetaConfig::default()),
    }
}

/// Substitute environment variables in the format `${VAR:-default}`
///
/// Unset variables without a default become empty.
pub fn substitute_env_vars(content: &str) -> String {
    let Some(re) = ENV_VAR.as_ref() else {
        return content.to_string();
    };

    re.replace_all(content, |caps: &Captures| {
        let var_name = &caps[1];
        match env::var(var_name) {
            Ok(value) => value,
            Err(_) => {
                let default = caps.get(3).map_or("", |m| m.as_str());
                if caps.get(3).is_none() {
                    warn!(variable = var_name, "unset variable in configuration");
                }
                default.to_string()
            }
        }
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sheetmeta_core::types::ProvenanceType;

    #[test]
    fn test_default_when_unset() {
        let out = substitute_env_vars("prefix: ${SHEETMETA_TEST_SURELY_UNSET:-LOT-}");
        assert_eq!(out, "prefix: LOT-");
        let out = substitute_env_vars("prefix: '${SHEETMETA_TEST_SURELY_UNSET}'");
        assert_eq!(out, "prefix: ''");
    }

    #[test]
    fn test_text_without_variables_unchanged() {
        let text = "sheets:\n  max_rows: 20\n";
        assert_eq!(substitute_env_vars(text), text);
    }

    #[test]
    fn test_blank_is_default() -> Result<()> {
        assert_eq!(parse_config("  \n")?, SheetMetaConfig::default());
        assert_eq!(load_or_default(None)?, SheetMetaConfig::default());
        Ok(())
    }

    #[test]
    fn test_parse_sections() -> Result<()> {
        let config = parse_config(
            "resolution:\n  packages: [core, CIDC]\n  provenance: activity\nsheets:\n  max_rows: 20\n",
        )?;
        assert_eq!(config.sheets.max_rows, 20);
        assert_eq!(config.resolution.provenance, Some(ProvenanceType::Activity));
        Ok(())
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            parse_config("sheets:\n  max_rows: 0\n"),
            Err(SheetMetaError::ConfigError(_))
        ));
        assert!(matches!(
            parse_config("sheets: [1, 2"),
            Err(SheetMetaError::ConfigError(_))
        ));
    }
}
