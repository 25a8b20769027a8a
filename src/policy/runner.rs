//! Policy runner.

use tracing::{error, info};

use crate::config::WorkflowContext;

use super::{PolicyCheck, PolicyResult};

/// Runs policy checks in order, logging each result. Never short-circuits.
#[must_use]
pub fn run_policy_checks(policies: &[&dyn PolicyCheck], context: &WorkflowContext) -> Vec<PolicyResult> {
    policies
        .iter()
        .map(|policy| {
            let result = policy.evaluate(context);
            if result.ok {
                info!("[POLICY] {}: {}", result.name, result.message);
            } else {
                error!("[POLICY] {}: {}", result.name, result.message);
            }
            result
        })
        .collect()
}

/// Returns the names of failed policy checks.
#[must_use]
pub fn failed_policies(results: &[PolicyResult]) -> Vec<String> {
    results
        .iter()
        .filter(|r| !r.ok)
        .map(|r| r.name.clone())
        .collect()
}
