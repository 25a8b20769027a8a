//! Azure response types and provisioning outcomes.

use serde::Deserialize;
use std::fmt;

use crate::error::{PlatformError, Result};

/// Site state reported by Azure for a started app.
pub const RUNNING_STATE: &str = "Running";

/// The subset of `az webapp show` output the workflow reads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteInfo {
    /// Platform state (`Running`, `Stopped`, ...).
    #[serde(default)]
    pub state: Option<String>,
    /// Default public host name.
    #[serde(default)]
    pub default_host_name: Option<String>,
}

impl SiteInfo {
    /// Returns true if the platform reports the site as `Running`.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.as_deref() == Some(RUNNING_STATE)
    }
}

/// Deployment credentials for the SCM (Kudu) site.
#[derive(Clone, Deserialize)]
pub struct PublishingCredentials {
    /// Basic auth user name.
    #[serde(rename = "publishingUserName")]
    pub user_name: String,
    /// Basic auth password.
    #[serde(rename = "publishingPassword")]
    pub password: String,
}

impl fmt::Debug for PublishingCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublishingCredentials")
            .field("user_name", &self.user_name)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Outcome of an idempotent ensure step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// The resource was already present; nothing was created.
    Exists,
    /// The resource was missing and has been created.
    Created,
    /// The resource was missing and creating it failed.
    Failed {
        /// Reason reported by the create step.
        reason: String,
    },
}

impl EnsureOutcome {
    /// Converts `Failed` into a fatal error for the named resource.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::ResourceCreationFailed`] for `Failed`.
    pub fn into_result(self, kind: &str, name: &str) -> Result<Self> {
        match self {
            Self::Failed { reason } => Err(PlatformError::ResourceCreationFailed {
                kind: kind.to_string(),
                name: name.to_string(),
                reason,
            }
            .into()),
            outcome => Ok(outcome),
        }
    }
}

impl fmt::Display for EnsureOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exists => write!(f, "exists"),
            Self::Created => write!(f, "created"),
            Self::Failed { reason } => write!(f, "failed ({reason})"),
        }
    }
}
