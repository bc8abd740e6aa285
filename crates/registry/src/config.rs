use crate::error::{RulebookError, RulebookErrorExt};
use crate::types::{DEFAULT_NAMESPACE, KEY_SEPARATOR};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Prefix for environment overrides, e.g. `RULEBOOK__DEFAULT_NAMESPACE=strict`.
pub const ENV_PREFIX: &str = "RULEBOOK";

/// Separator placed between rendered messages of the same field.
pub const DEFAULT_MESSAGE_SEPARATOR: &str = ";";

/// Dispatcher settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RulebookConfig {
    /// Namespace used by `Dispatcher::validate`.
    pub default_namespace: String,
    /// Joins the messages of one field.
    pub message_separator: String,
}

impl Default for RulebookConfig {
    fn default() -> Self {
        Self {
            default_namespace: DEFAULT_NAMESPACE.to_owned(),
            message_separator: DEFAULT_MESSAGE_SEPARATOR.to_owned(),
        }
    }
}

impl RulebookConfig {
    /// Checks that the default namespace can form a validator key.
    ///
    /// # Errors
    ///
    /// Returns [`RulebookError::Config`] if the namespace is blank or contains `#`.
    pub fn validate(&self) -> Result<(), RulebookError> {
        if self.default_namespace.trim().is_empty() {
            return Err(config::ConfigError::Message("default_namespace cannot be empty".into()))
                .context("Validating rulebook config");
        }
        if self.default_namespace.contains(KEY_SEPARATOR) {
            return Err(config::ConfigError::Message(format!(
                "default_namespace cannot contain '{KEY_SEPARATOR}'"
            )))
            .context("Validating rulebook config");
        }
        Ok(())
    }
}

/// Loads [`RulebookConfig`] from a file layered with environment overrides.
///
/// 1. **Base File**: `path`, or `rulebook` in the working directory. The format
///    is picked from the extension (`.toml`, `.yaml`, `.json`, ...).
/// 2. **Environment Overrides**: variables prefixed with `RULEBOOK__`, e.g.
///    `RULEBOOK__MESSAGE_SEPARATOR=" | "`.
///
/// # Errors
///
/// Returns [`RulebookError::Config`] if the file is missing, cannot be
/// deserialized, or holds an invalid default namespace.
pub fn load_config(path: Option<impl AsRef<Path>>) -> Result<RulebookConfig, RulebookError> {
    load_layered(path, None)
}

/// `env` replaces the process environment when set.
fn load_layered(
    path: Option<impl AsRef<Path>>,
    env: Option<config::Map<String, String>>,
) -> Result<RulebookConfig, RulebookError> {
    let effective_path =
        path.map_or_else(|| PathBuf::from("rulebook"), |p| p.as_ref().to_path_buf());

    info!("Loading rulebook config from {}", effective_path.display());

    let config = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .convert_case(config::Case::Snake)
                .source(env),
        )
        .build()
        .context("Failed to build rulebook config")?
        .try_deserialize::<RulebookConfig>()
        .context("Failed to deserialize rulebook config")?;

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let config = RulebookConfig::default();
        assert_eq!(config.default_namespace, "default");
        assert_eq!(config.message_separator, ";");
        config.validate().unwrap();
    }

    #[test]
    fn rejects_namespace_with_key_separator() {
        let config =
            RulebookConfig { default_namespace: "a#b".to_owned(), ..RulebookConfig::default() };
        assert!(matches!(config.validate(), Err(RulebookError::Config { .. })));
    }

    #[test]
    fn environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rulebook.toml");
        std::fs::write(&path, "default_namespace = \"strict\"\nmessage_separator = \",\"\n").unwrap();

        let env = config::Map::from([(
            "RULEBOOK__DEFAULT_NAMESPACE".to_owned(),
            "import".to_owned(),
        )]);
        let config = load_layered(Some(&path), Some(env)).unwrap();

        assert_eq!(config.default_namespace, "import");
        assert_eq!(config.message_separator, ",");
    }

    #[test]
    fn rejects_blank_namespace() {
        let config =
            RulebookConfig { default_namespace: "  ".to_owned(), ..RulebookConfig::default() };
        assert!(config.validate().is_err());
    }
}
