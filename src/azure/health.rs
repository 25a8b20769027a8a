//! HTTP probes for the deployed site.
//!
//! Probes never fail: every transport problem collapses into
//! [`ProbeStatus::Unavailable`], which prints as `000`.

use regex::Regex;
use reqwest::Client;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{Result, SiteshipError};
use crate::exec::{CommandRunner, Invocation, null_device};

/// Timeout for post-deployment HTTP validation.
pub const VALIDATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection timeout for native probes.
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Outcome of a single HTTP probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    /// The server answered with this status code.
    Code(u16),
    /// No answer (timeout, DNS, TLS or connection failure).
    Unavailable,
}

impl ProbeStatus {
    /// Returns true for HTTP 200.
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Code(200))
    }

    /// Returns the status code, if any.
    #[must_use]
    pub const fn code(self) -> Option<u16> {
        match self {
            Self::Code(code) => Some(code),
            Self::Unavailable => None,
        }
    }

    /// Parses curl's `%{http_code}` output, where `000` means no response.
    #[must_use]
    pub fn from_curl(output: &str) -> Self {
        match output.trim().parse::<u16>() {
            Ok(0) | Err(_) => Self::Unavailable,
            Ok(code) => Self::Code(code),
        }
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{code}"),
            Self::Unavailable => write!(f, "000"),
        }
    }
}

/// Result of the pre-deployment quick-check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickCheck {
    /// True only if the site is running and its homepage returns 200.
    pub healthy: bool,
    /// `https://<default host>`, when the host name is known.
    pub base_url: Option<String>,
}

impl QuickCheck {
    /// A quick-check that could not determine anything.
    #[must_use]
    pub const fn unknown() -> Self {
        Self {
            healthy: false,
            base_url: None,
        }
    }
}

/// Probe of the first asset referenced by `index.html`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetProbe {
    /// Asset path, e.g. `/assets/index-abc123.js`.
    pub path: String,
    /// Probe status.
    pub status: ProbeStatus,
}

/// Result of post-deployment HTTP validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpValidation {
    /// Homepage probe status.
    pub homepage: ProbeStatus,
    /// Asset probe, if the local `index.html` referenced one.
    pub asset: Option<AssetProbe>,
}

impl HttpValidation {
    /// Returns true if the homepage and the asset (if any) returned 200.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.homepage.is_ok() && self.asset.as_ref().is_none_or(|a| a.status.is_ok())
    }
}

/// Extracts the first `/assets/...` reference from an `href` or `src`
/// attribute.
#[must_use]
pub fn find_asset_path(html: &str) -> Option<String> {
    let pattern = Regex::new(r#"(?:href|src)="(/assets/[^"]+)""#).ok()?;
    pattern
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// HTTP status prober: curl when available, otherwise a native `HEAD`.
#[derive(Debug, Clone)]
pub struct HttpProber {
    /// Runner for curl.
    runner: Arc<dyn CommandRunner>,
    /// Resolved curl executable.
    curl: Option<PathBuf>,
    /// Native client fallback.
    client: Client,
}

impl HttpProber {
    /// Creates a prober, resolving curl on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(runner: Arc<dyn CommandRunner>) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| SiteshipError::internal(format!("Failed to create HTTP client: {e}")))?;
        let curl = runner.locate("curl");

        Ok(Self {
            runner,
            curl,
            client,
        })
    }

    /// Returns the HTTP status of `url` within `timeout`.
    pub async fn http_status(&self, url: &str, timeout: Duration) -> ProbeStatus {
        let status = match &self.curl {
            Some(curl) => self.curl_status(curl, url, timeout).await,
            None => self.native_status(url, timeout).await,
        };
        debug!("Probe {url} -> {status}");
        status
    }

    async fn curl_status(&self, curl: &Path, url: &str, timeout: Duration) -> ProbeStatus {
        let invocation = Invocation::new(curl)
            .args([
                String::from("-sS"),
                String::from("-o"),
                null_device().display().to_string(),
                String::from("-w"),
                String::from("%{http_code}"),
                url.to_string(),
            ])
            .captured()
            .with_timeout(timeout);

        match self.runner.run(&invocation).await {
            Ok(output) => ProbeStatus::from_curl(&output.stdout),
            Err(e) => {
                debug!("curl failed for {url}: {e}");
                ProbeStatus::Unavailable
            }
        }
    }

    async fn native_status(&self, url: &str, timeout: Duration) -> ProbeStatus {
        match self.client.head(url).timeout(timeout).send().await {
            Ok(response) => ProbeStatus::Code(response.status().as_u16()),
            Err(e) => {
                debug!("HEAD {url} failed: {e}");
                ProbeStatus::Unavailable
            }
        }
    }

    /// Probes the homepage and the first asset referenced by the local
    /// `index.html`. Logs the outcome; never fails.
    pub async fn validate_http(&self, base_url: &str, index_html: &Path) -> HttpValidation {
        let base = base_url.trim_end_matches('/');
        let homepage = self.http_status(base, VALIDATION_TIMEOUT).await;
        info!("Homepage {base} -> {homepage}");

        let asset_path = match tokio::fs::read_to_string(index_html).await {
            Ok(html) => find_asset_path(&html),
            Err(e) => {
                debug!("Could not read {}: {e}", index_html.display());
                None
            }
        };

        let asset = match asset_path {
            Some(path) => {
                let status = self.http_status(&format!("{base}{path}"), VALIDATION_TIMEOUT).await;
                info!("Asset {path} -> {status}");
                Some(AssetProbe { path, status })
            }
            None => None,
        };

        let validation = HttpValidation { homepage, asset };
        if validation.passed() {
            info!("HTTP validation passed.");
        } else {
            warn!(
                "HTTP validation failed: homepage={}, asset={}",
                validation.homepage,
                validation
                    .asset
                    .as_ref()
                    .map_or_else(|| String::from("none"), |a| a.status.to_string())
            );
        }
        validation
    }
}
