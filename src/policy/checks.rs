//! Built-in policy checks.

use crate::checks::NamedCheck;
use crate::config::WorkflowContext;

use super::{PolicyCheck, PolicyRegistry, PolicyResult};

/// Maximum length of an App Service app name.
const MAX_APP_NAME_LEN: usize = 60;

/// Returns the default policies, in execution order.
#[must_use]
pub fn default_policies() -> PolicyRegistry {
    PolicyRegistry::new()
        .with(Box::new(LocationDefinedPolicy))
        .with(Box::new(AppNamePolicy))
}

/// Requires a non-empty deployment location.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocationDefinedPolicy;

impl LocationDefinedPolicy {
    /// Policy name.
    pub const NAME: &'static str = "policy.location.defined";
}

impl NamedCheck for LocationDefinedPolicy {
    fn name(&self) -> &str {
        Self::NAME
    }
}

impl PolicyCheck for LocationDefinedPolicy {
    fn evaluate(&self, context: &WorkflowContext) -> PolicyResult {
        let location = context.config.location.trim();
        if location.is_empty() {
            PolicyResult::fail(Self::NAME, "Location is empty.")
        } else {
            PolicyResult::pass(Self::NAME, format!("Location set to {location}."))
        }
    }
}

/// Requires an app name the platform accepts as a host name label.
#[derive(Debug, Default, Clone, Copy)]
pub struct AppNamePolicy;

impl AppNamePolicy {
    /// Policy name.
    pub const NAME: &'static str = "policy.app_name.valid";
}

impl NamedCheck for AppNamePolicy {
    fn name(&self) -> &str {
        Self::NAME
    }
}

impl PolicyCheck for AppNamePolicy {
    fn evaluate(&self, context: &WorkflowContext) -> PolicyResult {
        let name = context.config.web_app_name.as_str();
        if is_valid_app_name(name) {
            PolicyResult::pass(Self::NAME, format!("App name '{name}' is valid."))
        } else {
            PolicyResult::fail(
                Self::NAME,
                format!(
                    "App name '{name}' must be 2-{MAX_APP_NAME_LEN} letters, digits or hyphens, \
                     not starting or ending with a hyphen."
                ),
            )
        }
    }
}

fn is_valid_app_name(name: &str) -> bool {
    if !(2..=MAX_APP_NAME_LEN).contains(&name.len()) {
        return false;
    }

    if name.starts_with('-') || name.ends_with('-') {
        return false;
    }

    name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeploymentConfig;

    fn context_with(location: &str, app: &str) -> WorkflowContext {
        let config = DeploymentConfig {
            location: location.to_string(),
            web_app_name: app.to_string(),
            ..DeploymentConfig::default()
        };
        WorkflowContext::new(config, "/work")
    }

    #[test]
    fn test_location_policy() {
        let ok = LocationDefinedPolicy.evaluate(&context_with("centralus", "shop"));
        assert_eq!(ok, PolicyResult::pass("policy.location.defined", "Location set to centralus."));

        let empty = LocationDefinedPolicy.evaluate(&context_with("", "shop"));
        assert_eq!(empty, PolicyResult::fail("policy.location.defined", "Location is empty."));
    }

    #[test]
    fn test_app_name_rules() {
        assert!(is_valid_app_name("pjweb-000002"));
        assert!(is_valid_app_name("Shop2"));
        assert!(!is_valid_app_name("a"));
        assert!(!is_valid_app_name("-shop"));
        assert!(!is_valid_app_name("shop-"));
        assert!(!is_valid_app_name("shop_web"));
        assert!(!is_valid_app_name(&"x".repeat(61)));
    }

    #[test]
    fn test_app_name_policy() {
        assert!(AppNamePolicy.evaluate(&context_with("centralus", "shop")).ok);
        assert!(!AppNamePolicy.evaluate(&context_with("centralus", "shop web")).ok);
    }

    #[test]
    fn test_default_policy_order() {
        assert_eq!(
            default_policies().names(),
            vec!["policy.location.defined", "policy.app_name.valid"]
        );
    }
}
