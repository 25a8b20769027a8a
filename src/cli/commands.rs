//! CLI command definitions.
//!
//! Every configuration field can be overridden from the command line. The
//! overrides are global so they apply to `deploy` and `check` alike.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::ConfigOverrides;

/// Siteship - build and deploy a static front-end to Azure App Service.
#[derive(Parser, Debug)]
#[command(name = "siteship")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the YAML configuration file (defaults to config/local.yaml
    /// under the workspace root).
    #[arg(short, long, global = true, env = "SITESHIP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the app workspace (defaults to the current directory).
    #[arg(long, global = true)]
    pub workspace_root: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Configuration overrides.
    #[command(flatten)]
    pub overrides: OverrideArgs,

    /// Subcommand to execute (defaults to `deploy`).
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Per-field configuration overrides.
#[derive(Args, Debug, Default, Clone)]
pub struct OverrideArgs {
    /// Resource group name.
    #[arg(long, global = true)]
    pub resource_group: Option<String>,

    /// Web app name.
    #[arg(long, global = true)]
    pub web_app_name: Option<String>,

    /// Azure region.
    #[arg(long, global = true)]
    pub location: Option<String>,

    /// App Service plan SKU.
    #[arg(long, global = true)]
    pub sku: Option<String>,

    /// Runtime identifier (e.g. NODE:20-lts).
    #[arg(long, global = true)]
    pub runtime: Option<String>,

    /// Build output directory, relative to the workspace root.
    #[arg(long, global = true)]
    pub dist_dir: Option<String>,

    /// Short-circuit if the site is already healthy.
    #[arg(long, global = true, overrides_with = "no_quick_check")]
    pub quick_check: bool,

    /// Always deploy, even if the site is healthy.
    #[arg(long, global = true, overrides_with = "quick_check")]
    pub no_quick_check: bool,

    /// Timeout (seconds) for HTTP checks.
    #[arg(long, global = true)]
    pub check_timeout_sec: Option<u64>,

    /// Cloud provider (azure, aws).
    #[arg(long, global = true)]
    pub provider: Option<String>,

    /// Explicit workflow name to run.
    #[arg(long, global = true)]
    pub workflow: Option<String>,

    /// IaC tool to orchestrate (terraform, bicep, cdk).
    #[arg(long = "iac", global = true)]
    pub iac_tool: Option<String>,

    /// Validation name to include (repeatable).
    #[arg(long = "validation", global = true, action = ArgAction::Append)]
    pub validations: Vec<String>,

    /// Policy check name to include (repeatable).
    #[arg(long = "policy", global = true, action = ArgAction::Append)]
    pub policy_checks: Vec<String>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Build and deploy (the default).
    Deploy,

    /// Run validations and policy checks without deploying.
    Check,

    /// List registered workflows.
    Workflows,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

impl Cli {
    /// Returns the subcommand, defaulting to `deploy`.
    #[must_use]
    pub fn selected_command(&self) -> Commands {
        self.command.unwrap_or(Commands::Deploy)
    }
}

impl OverrideArgs {
    /// Converts the flags into config overrides. Unset flags override
    /// nothing; empty repeatable lists keep the configured selection.
    #[must_use]
    pub fn to_overrides(&self) -> ConfigOverrides {
        let quick_check = if self.quick_check {
            Some(true)
        } else if self.no_quick_check {
            Some(false)
        } else {
            None
        };
        let non_empty = |list: &Vec<String>| (!list.is_empty()).then(|| list.clone());

        ConfigOverrides {
            resource_group: self.resource_group.clone(),
            web_app_name: self.web_app_name.clone(),
            location: self.location.clone(),
            sku: self.sku.clone(),
            runtime: self.runtime.clone(),
            dist_dir: self.dist_dir.clone(),
            quick_check,
            check_timeout_sec: self.check_timeout_sec,
            provider: self.provider.clone(),
            workflow: self.workflow.clone(),
            iac_tool: self.iac_tool.clone(),
            validations: non_empty(&self.validations),
            policy_checks: non_empty(&self.policy_checks),
        }
    }
}
