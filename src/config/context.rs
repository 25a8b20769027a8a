//! Per-run workflow context.

use std::path::{Path, PathBuf};

use super::spec::DeploymentConfig;

/// Immutable state shared by every workflow step.
#[derive(Debug, Clone)]
pub struct WorkflowContext {
    /// Effective deployment configuration.
    pub config: DeploymentConfig,
    /// Absolute workspace root (where the front-end project lives).
    pub workspace_root: PathBuf,
}

impl WorkflowContext {
    /// Creates a new context.
    #[must_use]
    pub fn new(config: DeploymentConfig, workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            config,
            workspace_root: workspace_root.into(),
        }
    }

    /// Returns the build output directory.
    #[must_use]
    pub fn dist_path(&self) -> PathBuf {
        self.workspace_root.join(&self.config.dist_dir)
    }

    /// Returns a path inside the workspace root.
    #[must_use]
    pub fn workspace_file(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.workspace_root.join(relative)
    }
}
