//! Kudu VFS diagnostics.
//!
//! After a deployment, the SCM site's virtual file system shows whether
//! `index.html` actually landed in `wwwroot`. This is a best-effort check:
//! every failure becomes [`VfsReport::Unavailable`].

use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tracing::debug;

use crate::error::{Result, SiteshipError};

use super::types::PublishingCredentials;

/// Timeout for each VFS request.
pub const VFS_TIMEOUT: Duration = Duration::from_secs(20);

/// Maximum number of `wwwroot` entries reported when `index.html` is missing.
const LISTING_LIMIT: usize = 5;

/// Outcome of the VFS check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VfsReport {
    /// `index.html` exists in `wwwroot`.
    IndexPresent {
        /// HTTP status of the `HEAD` request.
        status: u16,
    },
    /// `index.html` is missing; the first entries of `wwwroot` are listed.
    IndexMissing {
        /// HTTP status of the `HEAD` request.
        status: u16,
        /// Up to five entry names.
        entries: Vec<String>,
    },
    /// The check could not be completed.
    Unavailable {
        /// What went wrong.
        reason: String,
    },
}

impl VfsReport {
    /// Creates an unavailable report.
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for VfsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexPresent { status } => write!(f, "index.html present (HTTP {status})"),
            Self::IndexMissing { status, entries } if entries.is_empty() => {
                write!(f, "index.html missing (HTTP {status}); wwwroot is empty")
            }
            Self::IndexMissing { status, entries } => write!(
                f,
                "index.html missing (HTTP {status}); wwwroot contains: {}",
                entries.join(", ")
            ),
            Self::Unavailable { reason } => write!(f, "VFS check unavailable: {reason}"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct VfsEntry {
    name: String,
}

/// Client for the Kudu VFS API.
#[derive(Debug, Clone)]
pub struct VfsInspector {
    /// HTTP client.
    client: Client,
}

impl VfsInspector {
    /// Creates a new inspector.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(VFS_TIMEOUT)
            .build()
            .map_err(|e| SiteshipError::internal(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Checks `wwwroot/index.html` on the SCM site at `scm_base_url`.
    pub async fn inspect(&self, scm_base_url: &str, credentials: &PublishingCredentials) -> VfsReport {
        let base = scm_base_url.trim_end_matches('/');
        let index_url = format!("{base}/api/vfs/site/wwwroot/index.html");
        debug!("VFS HEAD {index_url}");

        let response = self
            .client
            .head(&index_url)
            .basic_auth(&credentials.user_name, Some(&credentials.password))
            .send()
            .await;

        let status = match response {
            Ok(response) => response.status(),
            Err(e) => return VfsReport::unavailable(e.to_string()),
        };

        if status.is_success() {
            return VfsReport::IndexPresent {
                status: status.as_u16(),
            };
        }

        match self.list_wwwroot(base, credentials).await {
            Ok(entries) => VfsReport::IndexMissing {
                status: status.as_u16(),
                entries,
            },
            Err(e) => VfsReport::unavailable(format!("could not list wwwroot: {e}")),
        }
    }

    async fn list_wwwroot(
        &self,
        base: &str,
        credentials: &PublishingCredentials,
    ) -> std::result::Result<Vec<String>, reqwest::Error> {
        let entries: Vec<VfsEntry> = self
            .client
            .get(format!("{base}/api/vfs/site/wwwroot/"))
            .basic_auth(&credentials.user_name, Some(&credentials.password))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(entries
            .into_iter()
            .take(LISTING_LIMIT)
            .map(|entry| entry.name)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials() -> PublishingCredentials {
        PublishingCredentials {
            user_name: String::from("$shop"),
            password: String::from("secret"),
        }
    }

    #[tokio::test]
    async fn test_index_present() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/api/vfs/site/wwwroot/index.html"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let report = VfsInspector::new()
            .unwrap()
            .inspect(&server.uri(), &credentials())
            .await;
        assert_eq!(report, VfsReport::IndexPresent { status: 200 });
    }

    #[tokio::test]
    async fn test_index_missing_lists_first_entries() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/api/vfs/site/wwwroot/index.html"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let listing: Vec<serde_json::Value> = (1..=7)
            .map(|i| serde_json::json!({ "name": format!("file{i}.txt"), "size": i }))
            .collect();
        Mock::given(method("GET"))
            .and(path("/api/vfs/site/wwwroot/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing))
            .mount(&server)
            .await;

        let report = VfsInspector::new()
            .unwrap()
            .inspect(&server.uri(), &credentials())
            .await;
        match report {
            VfsReport::IndexMissing { status, entries } => {
                assert_eq!(status, 404);
                assert_eq!(entries.len(), 5);
                assert_eq!(entries[0], "file1.txt");
            }
            other => panic!("unexpected report: {other}"),
        }
    }

    #[tokio::test]
    async fn test_listing_failure_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let report = VfsInspector::new()
            .unwrap()
            .inspect(&server.uri(), &credentials())
            .await;
        assert!(matches!(report, VfsReport::Unavailable { .. }));
        assert!(report.to_string().starts_with("VFS check unavailable"));
    }
}
