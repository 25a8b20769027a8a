//! IaC tool lookup.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{ConfigError, Result};

use super::{BicepOrchestrator, CdkOrchestrator, IacOrchestrator, TerraformOrchestrator};

/// Orchestrators keyed by lowercase tool name.
#[derive(Debug, Default, Clone)]
pub struct IacRegistry {
    tools: HashMap<String, Arc<dyn IacOrchestrator>>,
}

impl IacRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with terraform, bicep and cdk.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(TerraformOrchestrator));
        registry.register(Arc::new(BicepOrchestrator));
        registry.register(Arc::new(CdkOrchestrator));
        registry
    }

    /// Registers an orchestrator under its lowercased name.
    pub fn register(&mut self, tool: Arc<dyn IacOrchestrator>) {
        self.tools.insert(tool.name().to_lowercase(), tool);
    }

    /// Looks up an orchestrator, ignoring case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn IacOrchestrator>> {
        self.tools.get(&name.to_lowercase()).cloned()
    }

    /// Resolves the configured tool. No name (or an empty one) means no
    /// orchestration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownIacTool` for a name nothing is
    /// registered under.
    pub fn resolve(&self, name: Option<&str>) -> Result<Option<Arc<dyn IacOrchestrator>>> {
        let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
            return Ok(None);
        };

        self.get(name)
            .map(Some)
            .ok_or_else(|| ConfigError::UnknownIacTool { name: name.to_string() }.into())
    }

    /// Returns registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SiteshipError;

    #[test]
    fn test_resolve_is_case_insensitive() {
        let registry = IacRegistry::with_defaults();
        let tool = registry.resolve(Some("Terraform")).unwrap().unwrap();
        assert_eq!(tool.name(), "terraform");
        assert_eq!(registry.names(), vec!["bicep", "cdk", "terraform"]);
    }

    #[test]
    fn test_resolve_absent_is_none() {
        let registry = IacRegistry::with_defaults();
        assert!(registry.resolve(None).unwrap().is_none());
        assert!(registry.resolve(Some("")).unwrap().is_none());
    }

    #[test]
    fn test_resolve_unknown_is_error() {
        let err = IacRegistry::with_defaults().resolve(Some("pulumi")).unwrap_err();
        assert!(matches!(
            err,
            SiteshipError::Config(ConfigError::UnknownIacTool { ref name }) if name == "pulumi"
        ));
        assert!(err.to_string().ends_with("Unknown IaC tool 'pulumi'."));
    }
}
