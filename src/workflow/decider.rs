//! Workflow selection.

use tracing::debug;

use crate::config::DeploymentConfig;

/// Azure App Service deployment workflow name.
pub const AZURE_APP_SERVICE_WORKFLOW: &str = "azure.app_service.deploy";

/// AWS static website workflow name. Nothing registers it yet.
pub const AWS_WEBSITE_WORKFLOW: &str = "aws.website.deploy";

/// Maps a configuration to a workflow name.
#[derive(Debug, Default, Clone, Copy)]
pub struct WorkflowDecider;

impl WorkflowDecider {
    /// Creates a decider.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Returns the explicit workflow if set, otherwise the provider's
    /// default. Unknown providers fall back to Azure App Service.
    #[must_use]
    pub fn decide(&self, config: &DeploymentConfig) -> String {
        if let Some(workflow) = config.workflow.as_deref().filter(|w| !w.trim().is_empty()) {
            debug!("Using explicit workflow '{workflow}'");
            return workflow.trim().to_string();
        }

        let workflow = match config.provider.to_lowercase().as_str() {
            "aws" => AWS_WEBSITE_WORKFLOW,
            _ => AZURE_APP_SERVICE_WORKFLOW,
        };
        debug!("Provider '{}' selects workflow '{workflow}'", config.provider);
        workflow.to_string()
    }
}
