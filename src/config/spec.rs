//! Deployment configuration types.
//!
//! These types are deserialized from the YAML config file. Every field has a
//! default, so a missing file or a partial mapping still yields a complete
//! configuration.

use serde::{Deserialize, Serialize};

/// Default resource group.
pub const DEFAULT_RESOURCE_GROUP: &str = "appsvc_linux_centralus_basic";

/// Default web app name.
pub const DEFAULT_WEB_APP_NAME: &str = "pjweb-000002";

/// Default region.
pub const DEFAULT_LOCATION: &str = "centralus";

/// Default App Service plan SKU.
pub const DEFAULT_SKU: &str = "B1";

/// Default runtime identifier.
pub const DEFAULT_RUNTIME: &str = "NODE:20-lts";

/// Default build output directory, relative to the workspace root.
pub const DEFAULT_DIST_DIR: &str = "dist";

/// Default quick-check probe timeout in seconds.
pub const DEFAULT_CHECK_TIMEOUT_SECS: u64 = 15;

/// Default cloud provider.
pub const DEFAULT_PROVIDER: &str = "azure";

/// Complete deployment configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentConfig {
    /// Resource group that holds the plan and the app.
    pub resource_group: String,

    /// Web app name, also used to derive the plan name.
    pub web_app_name: String,

    /// Region for newly created resources.
    pub location: String,

    /// App Service plan SKU.
    pub sku: String,

    /// Runtime identifier (e.g. `NODE:20-lts`).
    pub runtime: String,

    /// Build output directory, relative to the workspace root.
    pub dist_dir: String,

    /// Whether to probe the live app and skip deployment when healthy.
    pub quick_check: bool,

    /// Timeout for quick-check probes, in seconds.
    pub check_timeout_sec: u64,

    /// Cloud provider key used by the workflow decider.
    pub provider: String,

    /// Explicit workflow name, overriding the decider.
    pub workflow: Option<String>,

    /// Optional infrastructure-as-code tool name.
    pub iac_tool: Option<String>,

    /// Validators to run (empty runs all).
    pub validations: Vec<String>,

    /// Policy checks to run (empty runs all).
    pub policy_checks: Vec<String>,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            resource_group: String::from(DEFAULT_RESOURCE_GROUP),
            web_app_name: String::from(DEFAULT_WEB_APP_NAME),
            location: String::from(DEFAULT_LOCATION),
            sku: String::from(DEFAULT_SKU),
            runtime: String::from(DEFAULT_RUNTIME),
            dist_dir: String::from(DEFAULT_DIST_DIR),
            quick_check: false,
            check_timeout_sec: DEFAULT_CHECK_TIMEOUT_SECS,
            provider: String::from(DEFAULT_PROVIDER),
            workflow: None,
            iac_tool: None,
            validations: Vec::new(),
            policy_checks: Vec::new(),
        }
    }
}

impl DeploymentConfig {
    /// Returns the App Service plan name derived from the web app name.
    #[must_use]
    pub fn plan_name(&self) -> String {
        format!("{}-plan", self.web_app_name)
    }

    /// Returns true if the runtime is a Linux runtime identifier.
    ///
    /// Linux runtimes use the `STACK:version` form and are served without
    /// `web.config`.
    #[must_use]
    pub fn is_linux_runtime(&self) -> bool {
        self.runtime.contains(':')
    }

    /// Applies per-field overrides on top of this configuration.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        fn set(target: &mut String, value: Option<&String>) {
            if let Some(value) = value {
                target.clone_from(value);
            }
        }

        set(&mut self.resource_group, overrides.resource_group.as_ref());
        set(&mut self.web_app_name, overrides.web_app_name.as_ref());
        set(&mut self.location, overrides.location.as_ref());
        set(&mut self.sku, overrides.sku.as_ref());
        set(&mut self.runtime, overrides.runtime.as_ref());
        set(&mut self.dist_dir, overrides.dist_dir.as_ref());
        set(&mut self.provider, overrides.provider.as_ref());

        if let Some(quick_check) = overrides.quick_check {
            self.quick_check = quick_check;
        }
        if let Some(timeout) = overrides.check_timeout_sec {
            self.check_timeout_sec = timeout;
        }
        if overrides.workflow.is_some() {
            self.workflow.clone_from(&overrides.workflow);
        }
        if overrides.iac_tool.is_some() {
            self.iac_tool.clone_from(&overrides.iac_tool);
        }
        if let Some(validations) = &overrides.validations {
            self.validations.clone_from(validations);
        }
        if let Some(policy_checks) = &overrides.policy_checks {
            self.policy_checks.clone_from(policy_checks);
        }

        self
    }
}

/// Optional per-field values that take precedence over the config file.
///
/// Produced from command-line flags and environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Resource group override.
    pub resource_group: Option<String>,
    /// Web app name override.
    pub web_app_name: Option<String>,
    /// Location override.
    pub location: Option<String>,
    /// SKU override.
    pub sku: Option<String>,
    /// Runtime override.
    pub runtime: Option<String>,
    /// Build output directory override.
    pub dist_dir: Option<String>,
    /// Quick-check toggle override.
    pub quick_check: Option<bool>,
    /// Quick-check timeout override, in seconds.
    pub check_timeout_sec: Option<u64>,
    /// Provider override.
    pub provider: Option<String>,
    /// Workflow name override.
    pub workflow: Option<String>,
    /// IaC tool override.
    pub iac_tool: Option<String>,
    /// Validator selection override.
    pub validations: Option<Vec<String>>,
    /// Policy selection override.
    pub policy_checks: Option<Vec<String>>,
}

impl ConfigOverrides {
    /// Returns true if no field is overridden.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
