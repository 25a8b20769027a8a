//! Pre-flight validation.
//!
//! Validators check the local environment before anything touches the
//! cloud. All selected validators run, every result is reported, and the
//! workflow gates on the aggregate.

mod runner;
mod validators;

use serde::Serialize;

use crate::checks::{CheckRegistry, NamedCheck};
use crate::config::WorkflowContext;

pub use runner::{failed_validations, run_validations};
pub use validators::{
    AzureCliValidator, NodeBuildToolsValidator, WebConfigValidator, default_validators,
};

/// Result of one validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// Validator name.
    pub name: String,
    /// Whether the validator passed.
    pub ok: bool,
    /// Human-readable outcome.
    pub message: String,
}

impl ValidationResult {
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

/// A named pre-flight check.
pub trait Validator: NamedCheck + Send + Sync {
    /// Evaluates the check against the run context.
    fn validate(&self, context: &WorkflowContext) -> ValidationResult;
}

/// Registry of validators, in registration order.
pub type ValidatorRegistry = CheckRegistry<dyn Validator>;
