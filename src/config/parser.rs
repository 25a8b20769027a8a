//! Configuration parser for loading and merging configuration files.
//!
//! Precedence per field is: command line, then environment
//! (`SITESHIP_*`), then the YAML file, then built-in defaults. A missing
//! config file is not an error.

use crate::error::{ConfigError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::spec::{ConfigOverrides, DeploymentConfig};

/// Default configuration file, relative to the workspace root.
pub const DEFAULT_CONFIG_PATH: &str = "config/local.yaml";

/// Prefix of the environment variables that override config fields.
pub const ENV_PREFIX: &str = "SITESHIP_";

/// Configuration parser for loading deployment configuration.
#[derive(Debug, Default)]
pub struct ConfigParser {
    /// Base path for resolving the default config file and `.env`.
    base_path: Option<PathBuf>,
}

impl ConfigParser {
    /// Creates a new configuration parser.
    #[must_use]
    pub const fn new() -> Self {
        Self { base_path: None }
    }

    /// Sets the base path for resolving relative paths.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Returns the config file to load: the explicit one, or the default
    /// location under the base path.
    #[must_use]
    pub fn resolve_path(&self, explicit: Option<&Path>) -> PathBuf {
        match explicit {
            Some(path) => path.to_path_buf(),
            None => self
                .base_path
                .as_ref()
                .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), |p| p.join(DEFAULT_CONFIG_PATH)),
        }
    }

    /// Loads configuration from a YAML file.
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<DeploymentConfig> {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found at {}, using defaults", path.display());
            return Ok(DeploymentConfig::default());
        }

        info!("Loading configuration from: {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::parse(
                format!("Failed to read file: {e}"),
                Some(path.display().to_string()),
            )
        })?;

        self.parse_yaml(&content, Some(path))
    }

    /// Parses configuration from a YAML string.
    ///
    /// An empty document yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or its root is not a mapping.
    pub fn parse_yaml(&self, content: &str, source: Option<&Path>) -> Result<DeploymentConfig> {
        debug!("Parsing YAML configuration");
        let location = || source.map(|p| p.display().to_string());

        let blank = content
            .lines()
            .map(str::trim)
            .all(|line| line.is_empty() || line.starts_with('#') || line == "---");
        if blank {
            return Ok(DeploymentConfig::default());
        }

        let value: serde_yaml::Value = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::parse(format!("YAML parse error: {e}"), location()))?;

        match value {
            serde_yaml::Value::Null => Ok(DeploymentConfig::default()),
            serde_yaml::Value::Mapping(_) => {
                let config: DeploymentConfig = serde_yaml::from_value(value)
                    .map_err(|e| ConfigError::parse(format!("YAML parse error: {e}"), location()))?;
                debug!("Parsed configuration for web app: {}", config.web_app_name);
                Ok(config)
            }
            _ => Err(ConfigError::parse("configuration root must be a mapping", location()).into()),
        }
    }

    /// Loads configuration with environment variable overrides.
    ///
    /// Environment variables use the form `SITESHIP_<FIELD>`
    /// (e.g. `SITESHIP_WEB_APP_NAME`).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_with_env(&self, path: impl AsRef<Path>) -> Result<DeploymentConfig> {
        let config = self.load_file(path)?;
        let overrides = Self::env_overrides(|key| std::env::var(key).ok());

        if !overrides.is_empty() {
            debug!("Applying environment overrides");
        }

        Ok(config.with_overrides(&overrides))
    }

    /// Collects overrides from a variable lookup.
    pub fn env_overrides(lookup: impl Fn(&str) -> Option<String>) -> ConfigOverrides {
        let get = |field: &str| lookup(&format!("{ENV_PREFIX}{field}")).filter(|v| !v.is_empty());
        let list = |field: &str| {
            get(field).map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect::<Vec<_>>()
            })
        };

        let quick_check = get("QUICK_CHECK").and_then(|v| match v.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            other => {
                warn!("Ignoring {ENV_PREFIX}QUICK_CHECK={other}: expected a boolean");
                None
            }
        });

        let check_timeout_sec = get("CHECK_TIMEOUT_SEC").and_then(|v| {
            v.parse::<u64>()
                .map_err(|_| warn!("Ignoring {ENV_PREFIX}CHECK_TIMEOUT_SEC={v}: expected seconds"))
                .ok()
        });

        ConfigOverrides {
            resource_group: get("RESOURCE_GROUP"),
            web_app_name: get("WEB_APP_NAME"),
            location: get("LOCATION"),
            sku: get("SKU"),
            runtime: get("RUNTIME"),
            dist_dir: get("DIST_DIR"),
            quick_check,
            check_timeout_sec,
            provider: get("PROVIDER"),
            workflow: get("WORKFLOW"),
            iac_tool: get("IAC_TOOL"),
            validations: list("VALIDATIONS"),
            policy_checks: list("POLICY_CHECKS"),
        }
    }

    /// Loads the .env file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the .env file exists but cannot be loaded.
    pub fn load_dotenv(&self) -> Result<()> {
        let env_path = self
            .base_path
            .as_ref()
            .map_or_else(|| PathBuf::from(".env"), |p| p.join(".env"));

        if env_path.exists() {
            info!("Loading environment from: {}", env_path.display());
            dotenvy::from_path(&env_path).map_err(|e| {
                ConfigError::parse(
                    format!("Failed to load .env file: {e}"),
                    Some(env_path.display().to_string()),
                )
            })?;
        } else {
            debug!(".env file not found at: {}", env_path.display());
        }

        Ok(())
    }
}
