//! Thin wrapper around the `az` command-line tool.

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{PlatformError, Result};
use crate::exec::{CommandOutput, CommandRunner, Invocation};

/// Executable names the Azure CLI may be installed under.
pub const AZ_CANDIDATES: &[&str] = &["az", "az.cmd"];

/// Azure CLI handle.
#[derive(Debug, Clone)]
pub struct AzureCli {
    /// Runner used to execute `az`.
    runner: Arc<dyn CommandRunner>,
    /// Resolved `az` executable, if installed.
    az: Option<PathBuf>,
}

impl AzureCli {
    /// Creates a handle, resolving `az` on `PATH`.
    #[must_use]
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        let az = runner.locate_any(AZ_CANDIDATES);
        Self { runner, az }
    }

    /// Returns the resolved executable, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.az.as_deref()
    }

    /// Returns the shared command runner.
    #[must_use]
    pub fn runner(&self) -> &Arc<dyn CommandRunner> {
        &self.runner
    }

    fn require_path(&self) -> Result<&Path> {
        self.path().ok_or_else(|| PlatformError::NotInstalled.into())
    }

    fn invocation(&self, args: &[&str]) -> Result<Invocation> {
        Ok(Invocation::new(self.require_path()?).args(args.iter().copied()))
    }

    /// Makes sure the CLI is installed and logged in, running the
    /// interactive `az login` if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if `az` is missing or login fails.
    pub async fn ensure_login(&self) -> Result<()> {
        let account = self.run(&["account", "show"]).await?;
        if account.success() {
            info!("Azure CLI is logged in.");
            return Ok(());
        }

        warn!("Azure CLI not logged in. Running 'az login'...");
        let login = self.run_streamed(&["login"]).await?;
        if !login.success() {
            return Err(PlatformError::LoginFailed.into());
        }

        info!("Azure login succeeded.");
        Ok(())
    }

    /// Runs `az` with captured output. A non-zero exit is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if `az` is missing or cannot be spawned.
    pub async fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        let invocation = self.invocation(args)?.captured();
        self.runner.run(&invocation).await
    }

    /// Runs `az` with output streamed to the terminal. A non-zero exit is
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if `az` is missing or cannot be spawned.
    pub async fn run_streamed(&self, args: &[&str]) -> Result<CommandOutput> {
        let invocation = self.invocation(args)?;
        self.runner.run(&invocation).await
    }

    /// Runs `az` with captured output and fails on a non-zero exit.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot run or exits unsuccessfully.
    pub async fn run_checked(&self, args: &[&str]) -> Result<CommandOutput> {
        let invocation = self.invocation(args)?.captured();
        let output = self.runner.run(&invocation).await?;

        if !output.success() {
            return Err(PlatformError::command_failed(
                invocation.command_line(),
                output.exit_code(),
                output.stderr.trim(),
            )
            .into());
        }
        Ok(output)
    }

    /// Runs `az` and parses its JSON output. `-o json` is appended unless
    /// an output format is already given; empty output parses as `null`.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails or the output does not match `T`.
    pub async fn json<T: DeserializeOwned>(&self, args: &[&str]) -> Result<T> {
        let mut full: Vec<&str> = args.to_vec();
        if !args.iter().any(|a| *a == "-o" || *a == "--output") {
            full.extend(["-o", "json"]);
        }

        let output = self.run_checked(&full).await?;
        let command = || format!("az {}", full.join(" "));
        let stdout = output.stdout.trim();

        let value: serde_json::Value = if stdout.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(stdout)
                .map_err(|e| PlatformError::invalid_output(command(), e.to_string()))?
        };
        debug!("Parsed JSON from `{}`", command());

        serde_json::from_value(value)
            .map_err(|e| PlatformError::invalid_output(command(), e.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SiteshipError;
    use crate::exec::testing::ScriptedRunner;

    fn make_cli(runner: ScriptedRunner) -> (AzureCli, Arc<ScriptedRunner>) {
        let runner = Arc::new(runner);
        (AzureCli::new(runner.clone()), runner)
    }

    #[tokio::test]
    async fn test_missing_cli_is_fatal() {
        let (cli, runner) = make_cli(ScriptedRunner::new());
        assert!(cli.path().is_none());

        let err = cli.ensure_login().await.unwrap_err();
        assert!(matches!(err, SiteshipError::Platform(PlatformError::NotInstalled)));
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_login_only_when_needed() {
        let (cli, runner) = make_cli(ScriptedRunner::new().with_tool("az"));
        cli.ensure_login().await.unwrap();
        assert_eq!(runner.calls(), vec!["az account show"]);

        let (cli, runner) = make_cli(
            ScriptedRunner::new()
                .with_tool("az.cmd")
                .on("account show", CommandOutput::failed(1, "Please run 'az login'")),
        );
        cli.ensure_login().await.unwrap();
        assert_eq!(runner.calls(), vec!["az.cmd account show", "az.cmd login"]);
    }

    #[tokio::test]
    async fn test_login_failure() {
        let (cli, _runner) = make_cli(
            ScriptedRunner::new()
                .with_tool("az")
                .on("account show", CommandOutput::failed(1, ""))
                .on("login", CommandOutput::failed(1, "")),
        );
        let err = cli.ensure_login().await.unwrap_err();
        assert_eq!(err.to_string(), "Platform error: Azure login failed");
    }

    #[tokio::test]
    async fn test_json_appends_output_flag() {
        let (cli, runner) = make_cli(
            ScriptedRunner::new()
                .with_tool("az")
                .on("webapp show", CommandOutput::ok(r#"{"state": "Running"}"#)),
        );
        let value: serde_json::Value = cli.json(&["webapp", "show"]).await.unwrap();
        assert_eq!(value["state"], "Running");

        let empty: Option<Vec<String>> = cli.json(&["group", "list", "--output", "json"]).await.unwrap();
        assert!(empty.is_none());
        assert_eq!(
            runner.calls(),
            vec!["az webapp show -o json", "az group list --output json"]
        );
    }

    #[tokio::test]
    async fn test_checked_failure_carries_stderr() {
        let (cli, _runner) = make_cli(
            ScriptedRunner::new()
                .with_tool("az")
                .on("webapp restart", CommandOutput::failed(2, "ResourceNotFound\n")),
        );
        let err = cli.run_checked(&["webapp", "restart"]).await.unwrap_err();
        match err {
            SiteshipError::Platform(PlatformError::CommandFailed { command, code, stderr }) => {
                assert_eq!(command, "az webapp restart");
                assert_eq!(code, 2);
                assert_eq!(stderr, "ResourceNotFound");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
