//! Placeholder orchestrators. Each operation only warns.

use async_trait::async_trait;
use tracing::warn;

use crate::config::WorkflowContext;
use crate::error::Result;

use super::IacOrchestrator;

fn not_implemented(label: &str, operation: &str) {
    warn!("{label} {operation} not implemented yet.");
}

macro_rules! placeholder_orchestrator {
    ($(#[$doc:meta])* $ty:ident, $name:literal, $label:literal) => {
        $(#[$doc])*
        #[derive(Debug, Default, Clone, Copy)]
        pub struct $ty;

        #[async_trait]
        impl IacOrchestrator for $ty {
            fn name(&self) -> &str {
                $name
            }

            async fn plan(&self, _context: &WorkflowContext) -> Result<()> {
                not_implemented($label, "planning");
                Ok(())
            }

            async fn apply(&self, _context: &WorkflowContext) -> Result<()> {
                not_implemented($label, "apply");
                Ok(())
            }

            async fn destroy(&self, _context: &WorkflowContext) -> Result<()> {
                not_implemented($label, "destroy");
                Ok(())
            }
        }
    };
}

placeholder_orchestrator!(
    /// Terraform orchestrator.
    TerraformOrchestrator,
    "terraform",
    "Terraform"
);

placeholder_orchestrator!(
    /// Bicep orchestrator.
    BicepOrchestrator,
    "bicep",
    "Bicep"
);

placeholder_orchestrator!(
    /// AWS CDK orchestrator.
    CdkOrchestrator,
    "cdk",
    "CDK"
);
