//! Workflow registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::{ConfigError, Result};

use super::Workflow;

/// Workflows keyed by name. Populated explicitly at startup.
#[derive(Default, Clone)]
pub struct WorkflowRegistry {
    workflows: HashMap<String, Arc<dyn Workflow>>,
}

impl WorkflowRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a workflow under its name, replacing any previous one.
    pub fn register(&mut self, workflow: Arc<dyn Workflow>) {
        debug!("Registering workflow: {}", workflow.name());
        self.workflows.insert(workflow.name().to_string(), workflow);
    }

    /// Builder-style registration.
    #[must_use]
    pub fn with(mut self, workflow: Arc<dyn Workflow>) -> Self {
        self.register(workflow);
        self
    }

    /// Returns a workflow by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Workflow>> {
        self.workflows.get(name).cloned()
    }

    /// Returns a workflow by name.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownWorkflow` listing the available names.
    pub fn get_required(&self, name: &str) -> Result<Arc<dyn Workflow>> {
        self.get(name).ok_or_else(|| {
            ConfigError::UnknownWorkflow {
                name: name.to_string(),
                available: self.names().join(", "),
            }
            .into()
        })
    }

    /// Returns all names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.workflows.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns true if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.workflows.contains_key(name)
    }

    /// Returns the number of workflows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.workflows.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty()
    }
}

impl fmt::Debug for WorkflowRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkflowRegistry")
            .field("workflows", &self.names())
            .finish()
    }
}
