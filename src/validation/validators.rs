//! Built-in validators.

use std::path::PathBuf;
use std::sync::Arc;

use crate::azure::AZ_CANDIDATES;
use crate::build::{BuildTool, STATIC_CONFIG_FILE};
use crate::checks::NamedCheck;
use crate::config::WorkflowContext;
use crate::exec::CommandRunner;

use super::{ValidationResult, Validator, ValidatorRegistry};

/// Returns the default validators, in execution order.
#[must_use]
pub fn default_validators(runner: &Arc<dyn CommandRunner>) -> ValidatorRegistry {
    ValidatorRegistry::new()
        .with(Box::new(AzureCliValidator::new(runner.clone())))
        .with(Box::new(NodeBuildToolsValidator::new(
            runner.clone(),
            crate::build::user_profile(),
        )))
        .with(Box::new(WebConfigValidator))
}

/// Checks that the Azure CLI is on `PATH`.
#[derive(Debug)]
pub struct AzureCliValidator {
    runner: Arc<dyn CommandRunner>,
}

impl AzureCliValidator {
    /// Validator name.
    pub const NAME: &'static str = "azure.cli.available";

    /// Creates the validator.
    #[must_use]
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

impl NamedCheck for AzureCliValidator {
    fn name(&self) -> &str {
        Self::NAME
    }
}

impl Validator for AzureCliValidator {
    fn validate(&self, _context: &WorkflowContext) -> ValidationResult {
        match self.runner.locate_any(AZ_CANDIDATES) {
            Some(az) => ValidationResult::pass(Self::NAME, format!("Azure CLI found at {}.", az.display())),
            None => ValidationResult::fail(Self::NAME, "Azure CLI not found on PATH."),
        }
    }
}

/// Checks that a Node build tool (yarn, the yarn shim, or npm) is available.
#[derive(Debug)]
pub struct NodeBuildToolsValidator {
    runner: Arc<dyn CommandRunner>,
    user_profile: Option<PathBuf>,
}

impl NodeBuildToolsValidator {
    /// Validator name.
    pub const NAME: &'static str = "node.build.tools";

    /// Creates the validator.
    #[must_use]
    pub fn new(runner: Arc<dyn CommandRunner>, user_profile: Option<PathBuf>) -> Self {
        Self { runner, user_profile }
    }
}

impl NamedCheck for NodeBuildToolsValidator {
    fn name(&self) -> &str {
        Self::NAME
    }
}

impl Validator for NodeBuildToolsValidator {
    fn validate(&self, _context: &WorkflowContext) -> ValidationResult {
        match BuildTool::resolve(self.runner.as_ref(), self.user_profile.as_deref()) {
            Some(tool) => ValidationResult::pass(Self::NAME, format!("Node build tooling detected ({tool}).")),
            None => ValidationResult::fail(Self::NAME, "Neither yarn nor npm found on PATH."),
        }
    }
}

/// Checks that `web.config` exists when the runtime needs it.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebConfigValidator;

impl WebConfigValidator {
    /// Validator name.
    pub const NAME: &'static str = "web.config.present";
}

impl NamedCheck for WebConfigValidator {
    fn name(&self) -> &str {
        Self::NAME
    }
}

impl Validator for WebConfigValidator {
    fn validate(&self, context: &WorkflowContext) -> ValidationResult {
        if context.config.is_linux_runtime() {
            return ValidationResult::pass(Self::NAME, "web.config not required for Linux runtime.");
        }

        if context.workspace_file(STATIC_CONFIG_FILE).is_file() {
            ValidationResult::pass(Self::NAME, "web.config found.")
        } else {
            ValidationResult::fail(Self::NAME, "web.config not found in workspace root.")
        }
    }
}
