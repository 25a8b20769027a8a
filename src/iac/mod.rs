//! Infrastructure-as-code orchestration.
//!
//! An orchestrator is selected by the `iac_tool` config key. The workflow
//! runs `plan` then `apply` after authentication; `destroy` is never called
//! by a deploy.

mod registry;
mod stubs;

use std::fmt::Debug;

use async_trait::async_trait;

use crate::config::WorkflowContext;
use crate::error::Result;

pub use registry::IacRegistry;
pub use stubs::{BicepOrchestrator, CdkOrchestrator, TerraformOrchestrator};

/// A pluggable infrastructure-as-code tool.
#[async_trait]
pub trait IacOrchestrator: Send + Sync + Debug {
    /// Lowercase tool name (e.g. `terraform`).
    fn name(&self) -> &str;

    /// Computes the changes the tool would make.
    ///
    /// # Errors
    ///
    /// Returns an error if planning fails.
    async fn plan(&self, context: &WorkflowContext) -> Result<()>;

    /// Applies the planned changes.
    ///
    /// # Errors
    ///
    /// Returns an error if applying fails.
    async fn apply(&self, context: &WorkflowContext) -> Result<()>;

    /// Tears down what the tool manages.
    ///
    /// # Errors
    ///
    /// Returns an error if teardown fails.
    async fn destroy(&self, context: &WorkflowContext) -> Result<()>;
}
