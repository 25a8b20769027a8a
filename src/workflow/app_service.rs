//! Azure App Service deployment workflow.
//!
//! Order of operations:
//!
//! 1. Validate the local environment, then gate.
//! 2. Evaluate governance policies, then gate.
//! 3. Resolve the IaC tool (config errors surface before any platform call).
//! 4. Authenticate the Azure CLI and run IaC plan/apply if configured.
//! 5. Early quick-check: a healthy site ends the run.
//! 6. Build, copy `web.config`, ensure resources.
//! 7. Late quick-check: a healthy site skips the upload.
//! 8. Deploy, restart, verify over HTTP and the SCM file system.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::azure::AppServiceProvider;
use crate::build;
use crate::checks::Selection;
use crate::config::WorkflowContext;
use crate::error::{GateError, Result};
use crate::exec::CommandRunner;
use crate::iac::IacRegistry;
use crate::policy::{PolicyCheck, PolicyRegistry, default_policies, failed_policies, run_policy_checks};
use crate::validation::{
    Validator, ValidatorRegistry, default_validators, failed_validations, run_validations,
};

use super::decider::AZURE_APP_SERVICE_WORKFLOW;
use super::{PreflightReport, Stage, Workflow, WorkflowResult};

/// Builds and deploys a static front-end to Azure App Service.
#[derive(Debug)]
pub struct AppServiceDeployWorkflow {
    /// Process runner shared with every platform call.
    runner: Arc<dyn CommandRunner>,
    /// Available validators.
    validators: ValidatorRegistry,
    /// Available policy checks.
    policies: PolicyRegistry,
    /// Available IaC tools.
    iac: IacRegistry,
    /// User profile directory used to find the yarn shim.
    user_profile: Option<PathBuf>,
}

impl AppServiceDeployWorkflow {
    /// Workflow name.
    pub const NAME: &'static str = AZURE_APP_SERVICE_WORKFLOW;

    /// Creates the workflow with the default checks and IaC tools.
    #[must_use]
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            validators: default_validators(&runner),
            policies: default_policies(),
            iac: IacRegistry::with_defaults(),
            user_profile: build::user_profile(),
            runner,
        }
    }

    /// Replaces the validator registry.
    #[must_use]
    pub fn with_validators(mut self, validators: ValidatorRegistry) -> Self {
        self.validators = validators;
        self
    }

    /// Replaces the policy registry.
    #[must_use]
    pub fn with_policies(mut self, policies: PolicyRegistry) -> Self {
        self.policies = policies;
        self
    }

    /// Replaces the IaC registry.
    #[must_use]
    pub fn with_iac_registry(mut self, iac: IacRegistry) -> Self {
        self.iac = iac;
        self
    }

    /// Overrides the user profile directory.
    #[must_use]
    pub fn with_user_profile(mut self, user_profile: Option<PathBuf>) -> Self {
        self.user_profile = user_profile;
        self
    }

    fn select_checks(
        &self,
        context: &WorkflowContext,
    ) -> (Selection<'_, dyn Validator>, Selection<'_, dyn PolicyCheck>) {
        let validators = self.validators.select(&context.config.validations);
        if !validators.unknown.is_empty() {
            warn!("Unknown validations ignored: {}", validators.unknown_list());
        }

        let policies = self.policies.select(&context.config.policy_checks);
        if !policies.unknown.is_empty() {
            warn!("Unknown policy checks ignored: {}", policies.unknown_list());
        }

        (validators, policies)
    }

    fn gate(&self, context: &WorkflowContext) -> Result<()> {
        let (validators, policies) = self.select_checks(context);

        enter(Stage::Validate);
        let failed = failed_validations(&run_validations(&validators.selected, context));
        if !failed.is_empty() {
            error!("Pre-deploy validation failed.");
            return Err(GateError::ValidationFailed { failed }.into());
        }

        enter(Stage::Policy);
        let failed = failed_policies(&run_policy_checks(&policies.selected, context));
        if !failed.is_empty() {
            error!("Policy checks failed.");
            return Err(GateError::PolicyFailed { failed }.into());
        }
        Ok(())
    }

    fn done(message: &str) -> WorkflowResult {
        WorkflowResult::success(Self::NAME, message)
    }
}

fn enter(stage: Stage) {
    debug!("Stage: {stage}");
}

#[async_trait]
impl Workflow for AppServiceDeployWorkflow {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn run(&self, context: &WorkflowContext) -> Result<WorkflowResult> {
        let config = &context.config;

        self.gate(context)?;
        let orchestrator = self.iac.resolve(config.iac_tool.as_deref())?;

        let provider = AppServiceProvider::new(self.runner.clone(), context.clone())?
            .with_user_profile(self.user_profile.clone());

        enter(Stage::Auth);
        provider.cli().ensure_login().await?;

        if let Some(orchestrator) = orchestrator {
            enter(Stage::Iac);
            info!("Running IaC orchestration: {}", orchestrator.name());
            orchestrator.plan(context).await?;
            orchestrator.apply(context).await?;
        }

        let timeout = Duration::from_secs(config.check_timeout_sec);
        if config.quick_check {
            enter(Stage::QuickCheckEarly);
            if provider.quick_check(timeout, true).await.healthy {
                return Ok(Self::done("QuickCheck passed; skipping deployment."));
            }
        }

        enter(Stage::Build);
        provider.build_app().await?;
        enter(Stage::StaticConfig);
        provider.copy_static_config()?;
        enter(Stage::Ensure);
        provider.ensure_resources().await?;

        let mut should_deploy = true;
        if config.quick_check {
            enter(Stage::QuickCheckLate);
            should_deploy = !provider.quick_check(timeout, false).await.healthy;
        }

        info!("Deploying to Azure Web App...");
        info!("   Resource Group: {}", config.resource_group);
        info!("   Web App Name: {}", config.web_app_name);
        info!("   Location: {}", config.location);

        if !should_deploy {
            let host = provider.get_hostname().await?;
            warn!("Skipping deployment: site already up (QuickCheck).");
            info!("Your app is available at: https://{host}");
            return Ok(Self::done("QuickCheck skipped deployment."));
        }

        enter(Stage::Deploy);
        provider.deploy_app().await?;
        let host = provider.get_hostname().await?;
        info!("Deployment completed successfully!");
        provider.restart().await?;

        let base_url = format!("https://{host}");
        info!("Your app is available at: {base_url}");

        enter(Stage::Verify);
        let http = provider.validate_http(&base_url).await;
        let vfs = provider.kudu_vfs_check().await;
        debug!("Verification: http_passed={}, vfs={vfs}", http.passed());

        Ok(Self::done("Deployment completed successfully."))
    }

    fn preflight(&self, context: &WorkflowContext) -> PreflightReport {
        let (validators, policies) = self.select_checks(context);
        PreflightReport {
            validations: run_validations(&validators.selected, context),
            policies: run_policy_checks(&policies.selected, context),
        }
    }
}
