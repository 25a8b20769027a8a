//! Governance policy checks.
//!
//! Policies run after validations with the same contract: every selected
//! check runs, each result is reported, and the workflow gates on the
//! aggregate.

mod checks;
mod runner;

use serde::Serialize;

use crate::checks::{CheckRegistry, NamedCheck};
use crate::config::WorkflowContext;

pub use checks::{AppNamePolicy, LocationDefinedPolicy, default_policies};
pub use runner::{failed_policies, run_policy_checks};

/// Result of one policy check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyResult {
    /// Policy name.
    pub name: String,
    /// Whether the policy passed.
    pub ok: bool,
    /// Human-readable outcome.
    pub message: String,
}

impl PolicyResult {
    /// Creates a passing result.
    #[must_use]
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ok: true,
            message: message.into(),
        }
    }

    /// Creates a failing result.
    #[must_use]
    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ok: false,
            message: message.into(),
        }
    }
}

/// A named governance rule.
pub trait PolicyCheck: NamedCheck + Send + Sync {
    /// Evaluates the policy against the run context.
    fn evaluate(&self, context: &WorkflowContext) -> PolicyResult;
}

/// Registry of policy checks, in registration order.
pub type PolicyRegistry = CheckRegistry<dyn PolicyCheck>;
