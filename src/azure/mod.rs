//! Azure App Service integration.
//!
//! This module provides:
//! - [`AzureCli`]: the `az` wrapper (login, checked runs, JSON output)
//! - [`AppServiceProvider`]: idempotent provisioning, configuration,
//!   packaging, deployment and verification
//! - [`HttpProber`]: curl or native HTTP status probes
//! - [`VfsInspector`]: Kudu VFS diagnostics

mod cli;
mod health;
mod provider;
mod types;
mod vfs;

pub use cli::{AZ_CANDIDATES, AzureCli};
pub use health::{
    AssetProbe, HttpProber, HttpValidation, ProbeStatus, QuickCheck, VALIDATION_TIMEOUT,
    find_asset_path,
};
pub use provider::{APP_SETTINGS, AppServiceProvider, HEALTH_CHECK_PATH, STARTUP_COMMAND};
pub use types::{EnsureOutcome, PublishingCredentials, RUNNING_STATE, SiteInfo};
pub use vfs::{VFS_TIMEOUT, VfsInspector, VfsReport};
