//! External process execution.
//!
//! Every external tool (the platform CLI, yarn/npm, curl) is reached through
//! [`CommandRunner`], so the workflow can be driven against a scripted runner
//! in tests.

use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

use crate::error::Result;

/// A single external command to run.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Program to execute (resolved path or bare name).
    pub program: PathBuf,
    /// Arguments, passed verbatim.
    pub args: Vec<String>,
    /// Working directory, if different from the current one.
    pub cwd: Option<PathBuf>,
    /// Capture stdout/stderr instead of inheriting the terminal.
    pub capture: bool,
    /// Upper bound on the run time.
    pub timeout: Option<Duration>,
}

impl Invocation {
    /// Creates an invocation that inherits the terminal.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            capture: false,
            timeout: None,
        }
    }

    /// Appends arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets the working directory.
    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Captures output instead of streaming it.
    #[must_use]
    pub const fn captured(mut self) -> Self {
        self.capture = true;
        self
    }

    /// Sets a timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the program's file name, for logs and matching.
    #[must_use]
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .map_or_else(|| self.program.display().to_string(), |n| n.to_string_lossy().into_owned())
    }

    /// Returns a printable command line.
    #[must_use]
    pub fn command_line(&self) -> String {
        if self.args.is_empty() {
            self.program_name()
        } else {
            format!("{} {}", self.program_name(), self.args.join(" "))
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Outcome of a finished (or timed out) command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` if killed by a signal or by the timeout.
    pub code: Option<i32>,
    /// Captured stdout (empty when not captured).
    pub stdout: String,
    /// Captured stderr (empty when not captured).
    pub stderr: String,
}

impl CommandOutput {
    /// A successful run with the given stdout.
    #[must_use]
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed run with the given exit code and stderr.
    #[must_use]
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Returns true if the command exited with status zero.
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.code, Some(0))
    }

    /// Returns the exit code, or -1 when there is none.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.code.unwrap_or(-1)
    }

    fn timed_out(limit: Duration) -> Self {
        Self {
            code: None,
            stdout: String::new(),
            stderr: format!("timed out after {}s", limit.as_secs()),
        }
    }
}

/// Runs external commands and resolves tools on `PATH`.
#[async_trait]
pub trait CommandRunner: Send + Sync + fmt::Debug {
    /// Resolves a tool name on `PATH`.
    fn locate(&self, tool: &str) -> Option<PathBuf>;

    /// Runs a command to completion.
    ///
    /// A non-zero exit is reported in the output, not as an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput>;

    /// Resolves the first of several candidate tool names.
    fn locate_any(&self, tools: &[&str]) -> Option<PathBuf> {
        tools.iter().find_map(|tool| self.locate(tool))
    }
}

/// Runner backed by real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    /// Creates a new system runner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    fn locate(&self, tool: &str) -> Option<PathBuf> {
        which::which(tool).ok()
    }

    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        debug!("Running: {invocation}");

        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args).kill_on_drop(true);
        if let Some(cwd) = &invocation.cwd {
            command.current_dir(cwd);
        }

        let execution = execute(&mut command, invocation.capture);

        let output = match invocation.timeout {
            Some(limit) => match tokio::time::timeout(limit, execution).await {
                Ok(result) => result?,
                Err(_) => CommandOutput::timed_out(limit),
            },
            None => execution.await?,
        };

        debug!("`{}` exited with {:?}", invocation.program_name(), output.code);
        Ok(output)
    }
}

async fn execute(command: &mut Command, capture: bool) -> std::io::Result<CommandOutput> {
    if capture {
        command.stdin(Stdio::null());
        let output = command.output().await?;
        return Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    let status = command.status().await?;
    Ok(CommandOutput {
        code: status.code(),
        ..CommandOutput::default()
    })
}

/// Returns the platform null device, for discarding tool output.
#[must_use]
pub fn null_device() -> &'static Path {
    if cfg!(windows) {
        Path::new("NUL")
    } else {
        Path::new("/dev/null")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_command_line() {
        let invocation = Invocation::new("/usr/bin/az")
            .args(["webapp", "show"])
            .args(vec![String::from("--name"), String::from("shop")])
            .captured();

        assert_eq!(invocation.program_name(), "az");
        assert_eq!(invocation.command_line(), "az webapp show --name shop");
        assert_eq!(invocation.to_string(), invocation.command_line());
        assert!(invocation.capture);
    }

    #[test]
    fn test_command_output_status() {
        assert!(CommandOutput::ok("true").success());
        let failed = CommandOutput::failed(3, "boom");
        assert!(!failed.success());
        assert_eq!(failed.exit_code(), 3);
        assert_eq!(CommandOutput::default().exit_code(), -1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_system_runner_captures_output() {
        let runner = SystemRunner::new();
        let invocation = Invocation::new("sh").args(["-c", "echo hello; exit 4"]).captured();

        let output = runner.run(&invocation).await.unwrap();
        assert_eq!(output.code, Some(4));
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_system_runner_timeout() {
        let runner = SystemRunner::new();
        let invocation = Invocation::new("sh")
            .args(["-c", "sleep 5"])
            .captured()
            .with_timeout(Duration::from_millis(100));

        let output = runner.run(&invocation).await.unwrap();
        assert!(!output.success());
        assert!(output.code.is_none());
    }

    #[tokio::test]
    async fn test_system_runner_spawn_failure() {
        let runner = SystemRunner::new();
        let invocation = Invocation::new("definitely-not-a-real-tool-siteship").captured();
        assert!(runner.run(&invocation).await.is_err());
        assert!(runner.locate("definitely-not-a-real-tool-siteship").is_none());
    }
}
