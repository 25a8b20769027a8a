//! Structural validation for deployment configurations.
//!
//! This catches values the workflow cannot run with at all (empty names,
//! zero timeouts). Governance rules such as "a location must be set" are
//! policy checks and live in [`crate::policy`].

use crate::error::{ConfigError, Result};
use tracing::debug;

use super::spec::DeploymentConfig;

/// Validator for deployment configurations.
#[derive(Debug, Default)]
pub struct ConfigValidator;

/// Validation result containing all problems found.
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// List of validation errors.
    pub errors: Vec<FieldError>,
    /// List of warnings (non-fatal issues).
    pub warnings: Vec<String>,
}

/// A single field error.
#[derive(Debug)]
pub struct FieldError {
    /// The field that failed validation.
    pub field: String,
    /// The error message.
    pub message: String,
}

impl ValidationReport {
    /// Returns true if no errors were found.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl ConfigValidator {
    /// Creates a new validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates a deployment configuration.
    ///
    /// # Errors
    ///
    /// Returns the first field error if validation fails.
    pub fn validate(&self, config: &DeploymentConfig) -> Result<ValidationReport> {
        let mut report = ValidationReport::default();

        let required = [
            ("resource_group", &config.resource_group),
            ("web_app_name", &config.web_app_name),
            ("sku", &config.sku),
            ("runtime", &config.runtime),
            ("dist_dir", &config.dist_dir),
            ("provider", &config.provider),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                report.errors.push(FieldError {
                    field: String::from(field),
                    message: format!("{field} cannot be empty"),
                });
            }
        }

        if config.check_timeout_sec == 0 {
            report.errors.push(FieldError {
                field: String::from("check_timeout_sec"),
                message: String::from("check_timeout_sec must be greater than zero"),
            });
        }

        if std::path::Path::new(&config.dist_dir).is_absolute() {
            report.warnings.push(format!(
                "dist_dir '{}' is absolute; it will not be resolved against the workspace root",
                config.dist_dir
            ));
        }

        if config.workflow.as_deref().is_some_and(str::is_empty) {
            report
                .warnings
                .push(String::from("workflow is empty; the provider default will be used"));
        }

        match report.errors.first() {
            None => {
                debug!("Configuration validation passed");
                Ok(report)
            }
            Some(first) => Err(ConfigError::validation(first.message.clone(), first.field.clone()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let report = ConfigValidator::new()
            .validate(&DeploymentConfig::default())
            .unwrap();
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_empty_app_name_rejected() {
        let config = DeploymentConfig {
            web_app_name: String::from("  "),
            ..DeploymentConfig::default()
        };
        let err = ConfigValidator::new().validate(&config).unwrap_err();
        assert!(err.to_string().contains("web_app_name cannot be empty"));
    }

    #[test]
    fn test_empty_location_left_to_policy() {
        let config = DeploymentConfig {
            location: String::new(),
            ..DeploymentConfig::default()
        };
        assert!(ConfigValidator::new().validate(&config).is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = DeploymentConfig {
            check_timeout_sec: 0,
            ..DeploymentConfig::default()
        };
        assert!(ConfigValidator::new().validate(&config).is_err());
    }
}
