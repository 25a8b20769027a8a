//! Validation runner.

use tracing::{error, info};

use crate::config::WorkflowContext;

use super::{ValidationResult, Validator};

/// Runs validators in order, logging each result. Never short-circuits.
#[must_use]
pub fn run_validations(validators: &[&dyn Validator], context: &WorkflowContext) -> Vec<ValidationResult> {
    validators
        .iter()
        .map(|validator| {
            let result = validator.validate(context);
            if result.ok {
                info!("[VALIDATION] {}: {}", result.name, result.message);
            } else {
                error!("[VALIDATION] {}: {}", result.name, result.message);
            }
            result
        })
        .collect()
}

/// Returns the names of failed validations.
#[must_use]
pub fn failed_validations(results: &[ValidationResult]) -> Vec<String> {
    results
        .iter()
        .filter(|r| !r.ok)
        .map(|r| r.name.clone())
        .collect()
}
