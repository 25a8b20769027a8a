//! Deployment workflows.
//!
//! A workflow is a named, end-to-end procedure run against a
//! [`WorkflowContext`]. The [`WorkflowDecider`] maps the configuration to a
//! workflow name and the [`WorkflowRegistry`] resolves it.

mod app_service;
mod decider;
mod registry;

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use crate::config::WorkflowContext;
use crate::error::Result;
use crate::policy::PolicyResult;
use crate::validation::ValidationResult;

pub use app_service::AppServiceDeployWorkflow;
pub use decider::{AWS_WEBSITE_WORKFLOW, AZURE_APP_SERVICE_WORKFLOW, WorkflowDecider};
pub use registry::WorkflowRegistry;

/// Final outcome of a workflow run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowResult {
    /// Workflow name.
    pub workflow: String,
    /// Whether the run succeeded.
    pub ok: bool,
    /// Human-readable summary.
    pub message: String,
}

impl WorkflowResult {
    /// Creates a successful result.
    #[must_use]
    pub fn success(workflow: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            workflow: workflow.into(),
            ok: true,
            message: message.into(),
        }
    }
}

/// Validation and policy results gathered without gating.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PreflightReport {
    /// Validation results, in execution order.
    pub validations: Vec<ValidationResult>,
    /// Policy results, in execution order.
    pub policies: Vec<PolicyResult>,
}

impl PreflightReport {
    /// Returns true if every check passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.validations.iter().all(|v| v.ok) && self.policies.iter().all(|p| p.ok)
    }
}

/// Workflow stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Pre-flight validations.
    Validate,
    /// Governance policies.
    Policy,
    /// Platform CLI authentication.
    Auth,
    /// Infrastructure-as-code plan and apply.
    Iac,
    /// Quick-check before building.
    QuickCheckEarly,
    /// Front-end build.
    Build,
    /// Static server config copy.
    StaticConfig,
    /// Resource group, plan and app.
    Ensure,
    /// Quick-check after ensuring resources.
    QuickCheckLate,
    /// Package upload and restart.
    Deploy,
    /// HTTP and file system verification.
    Verify,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validate => "validate",
            Self::Policy => "policy",
            Self::Auth => "auth",
            Self::Iac => "iac",
            Self::QuickCheckEarly => "quickcheck-early",
            Self::Build => "build",
            Self::StaticConfig => "static-config",
            Self::Ensure => "ensure",
            Self::QuickCheckLate => "quickcheck-late",
            Self::Deploy => "deploy",
            Self::Verify => "verify",
        };
        write!(f, "{name}")
    }
}

/// A named deployment procedure.
#[async_trait]
pub trait Workflow: Send + Sync + fmt::Debug {
    /// Returns the workflow name (e.g. `azure.app_service.deploy`).
    fn name(&self) -> &str;

    /// Runs the workflow to completion.
    ///
    /// # Errors
    ///
    /// Returns an error on any gate failure or fatal step.
    async fn run(&self, context: &WorkflowContext) -> Result<WorkflowResult>;

    /// Runs the selected validations and policies without gating or
    /// touching the platform.
    fn preflight(&self, context: &WorkflowContext) -> PreflightReport;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preflight_passed() {
        let mut report = PreflightReport::default();
        assert!(report.passed());

        report.validations.push(ValidationResult::pass("a", "ok"));
        report.policies.push(PolicyResult::fail("b", "no"));
        assert!(!report.passed());
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::QuickCheckEarly.to_string(), "quickcheck-early");
        assert_eq!(Stage::Deploy.to_string(), "deploy");
    }
}
