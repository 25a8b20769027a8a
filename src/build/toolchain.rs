//! Node build tool resolution and the build step.

use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{BuildError, Result};
use crate::exec::{CommandRunner, Invocation};

/// Yarn launchers, in preference order.
const YARN_CANDIDATES: &[&str] = &["yarn.cmd", "yarn"];

/// Location of the yarn `PowerShell` shim under the user profile.
const YARN_SCRIPT: &str = "AppData/Roaming/npm/yarn.ps1";

/// Returns the user profile directory, if the platform defines one.
#[must_use]
pub fn user_profile() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE").map(PathBuf::from)
}

/// The tool used to run the project's `build` script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildTool {
    /// A yarn executable on `PATH`.
    Yarn(PathBuf),
    /// The yarn `PowerShell` shim, run through `powershell`.
    YarnScript(PathBuf),
    /// npm, used as a last resort.
    Npm(PathBuf),
}

impl BuildTool {
    /// Resolves the preferred build tool: yarn, then the yarn shim, then npm.
    #[must_use]
    pub fn resolve(runner: &dyn CommandRunner, user_profile: Option<&Path>) -> Option<Self> {
        if let Some(yarn) = runner.locate_any(YARN_CANDIDATES) {
            return Some(Self::Yarn(yarn));
        }

        if let Some(script) = user_profile
            .map(|profile| profile.join(YARN_SCRIPT))
            .filter(|script| script.is_file())
        {
            return Some(Self::YarnScript(script));
        }

        runner.locate("npm").map(Self::Npm)
    }

    /// Returns the build invocation, run from `workspace_root`.
    #[must_use]
    pub fn build_invocation(&self, workspace_root: &Path) -> Invocation {
        let invocation = match self {
            Self::Yarn(path) => Invocation::new(path).args(["build"]),
            Self::YarnScript(script) => Invocation::new("powershell").args([
                String::from("-ExecutionPolicy"),
                String::from("Bypass"),
                String::from("-File"),
                script.display().to_string(),
                String::from("build"),
            ]),
            Self::Npm(path) => Invocation::new(path).args(["run", "build"]),
        };
        invocation.current_dir(workspace_root)
    }

    /// Returns true for the npm fallback.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Npm(_))
    }
}

impl fmt::Display for BuildTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yarn(_) => write!(f, "yarn"),
            Self::YarnScript(_) => write!(f, "yarn (PowerShell)"),
            Self::Npm(_) => write!(f, "npm"),
        }
    }
}

/// Runs the project build in `workspace_root`.
///
/// # Errors
///
/// Returns an error if no build tool is available or the build fails.
pub async fn build_app(
    runner: &dyn CommandRunner,
    workspace_root: &Path,
    user_profile: Option<&Path>,
) -> Result<BuildTool> {
    let tool = BuildTool::resolve(runner, user_profile).ok_or(BuildError::ToolchainMissing)?;

    if tool.is_fallback() {
        warn!("Yarn not found; falling back to npm run build");
    }

    let invocation = tool.build_invocation(workspace_root);
    info!("Building app with {tool}...");
    let output = runner.run(&invocation).await?;

    if !output.success() {
        return Err(BuildError::Failed {
            command: invocation.command_line(),
            code: output.exit_code(),
        }
        .into());
    }

    info!("Build completed.");
    Ok(tool)
}
