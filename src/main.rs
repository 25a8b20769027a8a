//! Siteship CLI entrypoint.
//!
//! This is the main entrypoint for the siteship command-line tool.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use siteship::cli::{Cli, Commands, OutputFormat, OutputFormatter};
use siteship::config::{ConfigParser, ConfigValidator, WorkflowContext};
use siteship::error::{ConfigError, Result, SiteshipError};
use siteship::exec::{CommandRunner, SystemRunner};
use siteship::workflow::{AppServiceDeployWorkflow, WorkflowDecider, WorkflowRegistry};

use clap::Parser;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.output);

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system. Logs go to stderr so stdout carries
/// only command output.
fn init_logging(verbose: bool, output: OutputFormat) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr);

    match output {
        OutputFormat::Json => builder.json().init(),
        OutputFormat::Text => builder.init(),
    }
}

/// Main async entry point. Returns whether the command succeeded.
async fn run(cli: Cli) -> Result<bool> {
    let formatter = OutputFormatter::new(cli.output);
    let runner: Arc<dyn CommandRunner> = Arc::new(SystemRunner);
    let registry = build_registry(&runner);

    match cli.selected_command() {
        Commands::Workflows => {
            emit(&formatter.format_workflows(&registry.names()))?;
            Ok(true)
        }
        Commands::Check => cmd_check(&cli, &registry, &formatter),
        Commands::Deploy => cmd_deploy(&cli, &registry, &formatter).await,
    }
}

/// Registers every available workflow.
fn build_registry(runner: &Arc<dyn CommandRunner>) -> WorkflowRegistry {
    WorkflowRegistry::new().with(Arc::new(AppServiceDeployWorkflow::new(runner.clone())))
}

/// Run validations and policies only.
fn cmd_check(cli: &Cli, registry: &WorkflowRegistry, formatter: &OutputFormatter) -> Result<bool> {
    let context = load_context(cli)?;
    let workflow_name = WorkflowDecider::new().decide(&context.config);
    let workflow = registry.get_required(&workflow_name)?;

    let report = workflow.preflight(&context);
    emit(&formatter.format_preflight(&report))?;
    Ok(report.passed())
}

/// Run the selected deployment workflow.
async fn cmd_deploy(cli: &Cli, registry: &WorkflowRegistry, formatter: &OutputFormatter) -> Result<bool> {
    let context = load_context(cli)?;
    let workflow_name = WorkflowDecider::new().decide(&context.config);
    let workflow = registry.get_required(&workflow_name)?;

    info!("Starting workflow: {workflow_name}");
    let result = workflow.run(&context).await?;
    if !result.ok {
        error!("{}", result.message);
    }

    emit(&formatter.format_result(&result))?;
    Ok(result.ok)
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Resolves the workspace root to an absolute path.
fn resolve_workspace_root(explicit: Option<&Path>) -> Result<PathBuf> {
    let root = match explicit {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir()?,
    };

    if !root.is_dir() {
        return Err(ConfigError::validation(
            format!("Workspace root not found: {}", root.display()),
            "workspace_root",
        )
        .into());
    }

    Ok(std::fs::canonicalize(&root)?)
}

/// Loads `.env`, the config file, environment and CLI overrides, then
/// validates the result.
fn load_context(cli: &Cli) -> Result<WorkflowContext> {
    let workspace_root = resolve_workspace_root(cli.workspace_root.as_deref())?;
    let parser = ConfigParser::new().with_base_path(&workspace_root);
    parser.load_dotenv()?;

    let config_file = parser.resolve_path(cli.config.as_deref());
    debug!("Loading configuration from: {}", config_file.display());

    let config = parser
        .load_with_env(&config_file)?
        .with_overrides(&cli.overrides.to_overrides());

    let report = ConfigValidator::new().validate(&config)?;
    for warning in &report.warnings {
        warn!("{warning}");
    }

    Ok(WorkflowContext::new(config, workspace_root))
}

/// Writes command output to stdout.
fn emit(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", text.trim_end()).map_err(SiteshipError::from)
}
