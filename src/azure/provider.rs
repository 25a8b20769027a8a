//! Azure App Service provider.
//!
//! Every `ensure_*` step checks for the resource first and only creates it
//! when absent, so re-running against an existing environment creates
//! nothing. Verification steps (`quick_check`, `validate_http`,
//! `kudu_vfs_check`) never fail the run.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::build::{self, BuildTool, DeploymentPackage, StaticConfigOutcome};
use crate::config::WorkflowContext;
use crate::error::{PlatformError, Result};
use crate::exec::CommandRunner;

use super::cli::AzureCli;
use super::health::{HttpProber, HttpValidation, ProbeStatus, QuickCheck};
use super::types::{EnsureOutcome, PublishingCredentials, SiteInfo};
use super::vfs::{VfsInspector, VfsReport};

/// App settings pushed on every deployment.
pub const APP_SETTINGS: &[&str] = &[
    "SCM_DO_BUILD_DURING_DEPLOYMENT=false",
    "ENABLE_ORYX_BUILD=false",
    "PORT=8080",
    "WEBSITES_PORT=8080",
];

/// Startup command serving the static build as a single-page app.
pub const STARTUP_COMMAND: &str = "pm2 serve /home/site/wwwroot 8080 --no-daemon --spa";

/// Health-check path configured on the site.
pub const HEALTH_CHECK_PATH: &str = "/index.html";

/// Provider for one web app on Azure App Service.
#[derive(Debug, Clone)]
pub struct AppServiceProvider {
    /// Run context.
    context: WorkflowContext,
    /// Azure CLI handle.
    cli: AzureCli,
    /// HTTP prober.
    prober: HttpProber,
    /// Kudu VFS client.
    vfs: VfsInspector,
    /// User profile directory used to find the yarn shim.
    user_profile: Option<PathBuf>,
}

impl AppServiceProvider {
    /// Creates a provider for the context's web app.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP clients cannot be created.
    pub fn new(runner: Arc<dyn CommandRunner>, context: WorkflowContext) -> Result<Self> {
        Ok(Self {
            prober: HttpProber::new(runner.clone())?,
            cli: AzureCli::new(runner),
            vfs: VfsInspector::new()?,
            user_profile: build::user_profile(),
            context,
        })
    }

    /// Overrides the user profile directory.
    #[must_use]
    pub fn with_user_profile(mut self, user_profile: Option<PathBuf>) -> Self {
        self.user_profile = user_profile;
        self
    }

    /// Returns the Azure CLI handle.
    #[must_use]
    pub const fn cli(&self) -> &AzureCli {
        &self.cli
    }

    fn group(&self) -> &str {
        &self.context.config.resource_group
    }

    fn app(&self) -> &str {
        &self.context.config.web_app_name
    }

    async fn create(&self, kind: &str, name: &str, args: &[&str]) -> Result<EnsureOutcome> {
        info!("Creating {kind} '{name}'...");
        let output = self.cli.run_streamed(args).await?;

        let outcome = if output.success() {
            info!("Created {kind} '{name}'.");
            EnsureOutcome::Created
        } else {
            EnsureOutcome::Failed {
                reason: format!("exit code {}", output.exit_code()),
            }
        };
        outcome.into_result(kind, name)
    }

    /// Ensures the resource group exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the existence query or the creation fails.
    pub async fn ensure_resource_group(&self, name: &str, location: &str) -> Result<EnsureOutcome> {
        let exists = self.cli.run_checked(&["group", "exists", "--name", name]).await?;
        if exists.stdout.trim().eq_ignore_ascii_case("true") {
            info!("Resource group '{name}' exists.");
            return Ok(EnsureOutcome::Exists);
        }

        self.create(
            "resource group",
            name,
            &["group", "create", "--name", name, "--location", location],
        )
        .await
    }

    /// Ensures the App Service plan exists (Linux, given SKU).
    ///
    /// # Errors
    ///
    /// Returns an error if the plan is missing and cannot be created.
    pub async fn ensure_app_service_plan(
        &self,
        plan: &str,
        group: &str,
        location: &str,
        sku: &str,
    ) -> Result<EnsureOutcome> {
        let show = self
            .cli
            .run(&["appservice", "plan", "show", "--name", plan, "--resource-group", group])
            .await?;
        if show.success() {
            info!("App Service plan '{plan}' exists.");
            return Ok(EnsureOutcome::Exists);
        }

        self.create(
            "App Service plan",
            plan,
            &[
                "appservice", "plan", "create", "--name", plan, "--resource-group", group,
                "--location", location, "--sku", sku, "--is-linux",
            ],
        )
        .await
    }

    /// Ensures the web app exists on the given plan and runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the app is missing and cannot be created.
    pub async fn ensure_web_app(
        &self,
        app: &str,
        group: &str,
        plan: &str,
        runtime: &str,
    ) -> Result<EnsureOutcome> {
        let show = self
            .cli
            .run(&["webapp", "show", "--name", app, "--resource-group", group])
            .await?;
        if show.success() {
            info!("Web app '{app}' exists.");
            return Ok(EnsureOutcome::Exists);
        }

        self.create(
            "web app",
            app,
            &[
                "webapp", "create", "--name", app, "--resource-group", group, "--plan", plan,
                "--runtime", runtime,
            ],
        )
        .await
    }

    /// Ensures the resource group, plan and web app, in that order.
    ///
    /// # Errors
    ///
    /// Returns an error if any resource cannot be ensured.
    pub async fn ensure_resources(&self) -> Result<()> {
        let config = &self.context.config;
        let plan = config.plan_name();

        self.ensure_resource_group(&config.resource_group, &config.location).await?;
        self.ensure_app_service_plan(&plan, &config.resource_group, &config.location, &config.sku)
            .await?;
        self.ensure_web_app(&config.web_app_name, &config.resource_group, &plan, &config.runtime)
            .await?;
        Ok(())
    }

    /// Pushes app settings, the startup command and the health-check path.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration command fails.
    pub async fn configure_app(&self) -> Result<()> {
        let (group, app) = (self.group(), self.app());
        info!("Configuring web app '{app}'...");

        let mut settings = vec![
            "webapp", "config", "appsettings", "set", "--resource-group", group, "--name", app,
            "--settings",
        ];
        settings.extend_from_slice(APP_SETTINGS);
        self.cli.run_checked(&settings).await?;

        self.cli
            .run_checked(&[
                "webapp", "config", "set", "--resource-group", group, "--name", app,
                "--startup-file", STARTUP_COMMAND,
            ])
            .await?;

        let health_check = format!("siteConfig.healthCheckPath={HEALTH_CHECK_PATH}");
        self.cli
            .run_checked(&[
                "webapp", "update", "--resource-group", group, "--name", app, "--set",
                &health_check,
            ])
            .await?;

        info!("Web app configured.");
        Ok(())
    }

    /// Builds the front-end in the workspace root.
    ///
    /// # Errors
    ///
    /// Returns an error if no build tool is found or the build fails.
    pub async fn build_app(&self) -> Result<BuildTool> {
        build::build_app(
            self.cli.runner().as_ref(),
            &self.context.workspace_root,
            self.user_profile.as_deref(),
        )
        .await
    }

    /// Copies `web.config` into the build output when required.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is required but missing.
    pub fn copy_static_config(&self) -> Result<StaticConfigOutcome> {
        build::copy_static_config(&self.context)
    }

    /// Packages the build output into an archive in the workspace root.
    ///
    /// # Errors
    ///
    /// Returns an error if the build output is missing or the archive
    /// cannot be written.
    pub fn create_package(&self, build_output_dir: &Path) -> Result<DeploymentPackage> {
        DeploymentPackage::create(build_output_dir, &self.context.workspace_root)
    }

    /// Uploads an archive with a clean deployment.
    ///
    /// # Errors
    ///
    /// Returns an error if the deploy command fails.
    pub async fn deploy_package(&self, group: &str, app: &str, archive: &Path) -> Result<()> {
        let archive_arg = archive.display().to_string();
        let output = self
            .cli
            .run_streamed(&[
                "webapp", "deploy", "--resource-group", group, "--name", app, "--src-path",
                &archive_arg, "--type", "zip", "--clean", "true",
            ])
            .await?;

        if !output.success() {
            return Err(PlatformError::DeploymentFailed {
                archive: archive.to_path_buf(),
                code: output.exit_code(),
            }
            .into());
        }
        Ok(())
    }

    /// Configures the app, packages the build output and deploys it. The
    /// archive is removed on every exit path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, packaging or deployment fails.
    pub async fn deploy_app(&self) -> Result<()> {
        self.configure_app().await?;

        let package = self.create_package(&self.context.dist_path())?;
        info!("Deploying {}...", package.path().display());
        self.deploy_package(self.group(), self.app(), package.path()).await?;
        drop(package);

        info!("Deployment upload finished.");
        Ok(())
    }

    /// Checks whether the live site is already running and serving 200.
    pub async fn quick_check(&self, timeout: Duration, early: bool) -> QuickCheck {
        let label = if early { "QuickCheck (early)" } else { "QuickCheck" };
        info!("{label}: checking current site state...");

        let site: SiteInfo = match self
            .cli
            .json(&["webapp", "show", "--name", self.app(), "--resource-group", self.group()])
            .await
        {
            Ok(site) => site,
            Err(e) => {
                warn!("{label}: could not read site info: {e}");
                return QuickCheck::unknown();
            }
        };

        let running = site.is_running();
        let Some(host) = site.default_host_name.filter(|h| !h.is_empty()) else {
            warn!("{label}: site has no default host name.");
            return QuickCheck::unknown();
        };

        let base_url = format!("https://{host}");
        let status = self.prober.http_status(&base_url, timeout).await;
        let healthy = running && status.is_ok();

        if healthy {
            info!("{label}: site is running and {base_url} returned {status}.");
        } else {
            info!(
                "{label}: state={}, status={status}; deployment required.",
                site.state.as_deref().unwrap_or("unknown")
            );
        }

        QuickCheck {
            healthy,
            base_url: Some(base_url),
        }
    }

    /// Returns the HTTP status of `url`.
    pub async fn http_status(&self, url: &str, timeout: Duration) -> ProbeStatus {
        self.prober.http_status(url, timeout).await
    }

    /// Probes the homepage and first referenced asset.
    pub async fn validate_http(&self, base_url: &str) -> HttpValidation {
        let index_html = self.context.dist_path().join("index.html");
        self.prober.validate_http(base_url, &index_html).await
    }

    /// Checks via the SCM site whether `index.html` landed in `wwwroot`.
    pub async fn kudu_vfs_check(&self) -> VfsReport {
        let report = self.inspect_vfs().await;
        match &report {
            VfsReport::IndexPresent { .. } => info!("VFS check: {report}"),
            VfsReport::IndexMissing { .. } | VfsReport::Unavailable { .. } => {
                warn!("VFS check: {report}");
            }
        }
        report
    }

    async fn inspect_vfs(&self) -> VfsReport {
        let (group, app) = (self.group(), self.app());

        let hosts: Vec<String> = match self
            .cli
            .json(&[
                "webapp", "show", "--name", app, "--resource-group", group, "--query",
                "enabledHostNames",
            ])
            .await
        {
            Ok(hosts) => hosts,
            Err(e) => return VfsReport::unavailable(e.to_string()),
        };

        let Some(scm_host) = hosts.into_iter().find(|h| h.contains(".scm.")) else {
            return VfsReport::unavailable("SCM host not found");
        };

        let credentials: PublishingCredentials = match self
            .cli
            .json(&[
                "webapp", "deployment", "list-publishing-credentials", "--name", app,
                "--resource-group", group,
            ])
            .await
        {
            Ok(credentials) => credentials,
            Err(e) => return VfsReport::unavailable(e.to_string()),
        };

        self.vfs
            .inspect(&format!("https://{scm_host}"), &credentials)
            .await
    }

    /// Returns the app's default host name, which may be empty if the
    /// platform has not assigned one.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn get_hostname(&self) -> Result<String> {
        let args = [
            "webapp", "show", "--name", self.app(), "--resource-group", self.group(), "--query",
            "defaultHostName", "-o", "tsv",
        ];
        let output = self.cli.run_checked(&args).await?;
        let host = output.stdout.trim();

        if host.is_empty() {
            warn!("Azure reported no default host name for {}", self.app());
        }
        Ok(host.to_string())
    }

    /// Restarts the web app.
    ///
    /// # Errors
    ///
    /// Returns an error if the restart command fails.
    pub async fn restart(&self) -> Result<()> {
        self.cli
            .run_checked(&["webapp", "restart", "--name", self.app(), "--resource-group", self.group()])
            .await?;
        info!("Web app restarted.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeploymentConfig;
    use crate::error::SiteshipError;
    use crate::exec::CommandOutput;
    use crate::exec::testing::ScriptedRunner;
    use tempfile::TempDir;

    fn provider(runner: &Arc<ScriptedRunner>, root: &Path) -> AppServiceProvider {
        let config = DeploymentConfig {
            resource_group: String::from("rg-web"),
            web_app_name: String::from("shop"),
            ..DeploymentConfig::default()
        };
        AppServiceProvider::new(runner.clone(), WorkflowContext::new(config, root))
            .unwrap()
            .with_user_profile(None)
    }

    #[tokio::test]
    async fn test_ensure_resources_creates_nothing_when_present() {
        let temp_dir = TempDir::new().unwrap();
        let runner = Arc::new(
            ScriptedRunner::new()
                .with_tool("az")
                .on("group exists", CommandOutput::ok("true\n")),
        );
        let provider = provider(&runner, temp_dir.path());

        provider.ensure_resources().await.unwrap();
        provider.ensure_resources().await.unwrap();

        assert_eq!(runner.count(" create "), 0);
        assert_eq!(runner.count("group exists"), 2);
        assert_eq!(runner.count("appservice plan show --name shop-plan"), 2);
        assert_eq!(runner.count("webapp show --name shop"), 2);
    }

    #[tokio::test]
    async fn test_ensure_resources_creates_missing() {
        let temp_dir = TempDir::new().unwrap();
        let runner = Arc::new(
            ScriptedRunner::new()
                .with_tool("az")
                .on("group exists", CommandOutput::ok("false"))
                .on("plan show", CommandOutput::failed(3, "ResourceNotFound"))
                .on("webapp show", CommandOutput::failed(3, "ResourceNotFound")),
        );
        let provider = provider(&runner, temp_dir.path());

        let outcome = provider.ensure_resource_group("rg-web", "centralus").await.unwrap();
        assert_eq!(outcome, EnsureOutcome::Created);
        provider.ensure_resources().await.unwrap();

        let calls = runner.calls();
        assert!(calls.contains(&String::from(
            "az group create --name rg-web --location centralus"
        )));
        assert!(calls.contains(&String::from(
            "az appservice plan create --name shop-plan --resource-group rg-web --location centralus --sku B1 --is-linux"
        )));
        assert!(calls.contains(&String::from(
            "az webapp create --name shop --resource-group rg-web --plan shop-plan --runtime NODE:20-lts"
        )));
    }

    #[tokio::test]
    async fn test_failed_creation_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let runner = Arc::new(
            ScriptedRunner::new()
                .with_tool("az")
                .on("webapp show", CommandOutput::failed(3, ""))
                .on("webapp create", CommandOutput::failed(1, "")),
        );
        let provider = provider(&runner, temp_dir.path());

        let err = provider
            .ensure_web_app("shop", "rg-web", "shop-plan", "NODE:20-lts")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SiteshipError::Platform(PlatformError::ResourceCreationFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_configure_app_commands() {
        let temp_dir = TempDir::new().unwrap();
        let runner = Arc::new(ScriptedRunner::new().with_tool("az"));
        let provider = provider(&runner, temp_dir.path());

        provider.configure_app().await.unwrap();
        assert_eq!(
            runner.calls(),
            vec![
                "az webapp config appsettings set --resource-group rg-web --name shop --settings SCM_DO_BUILD_DURING_DEPLOYMENT=false ENABLE_ORYX_BUILD=false PORT=8080 WEBSITES_PORT=8080",
                "az webapp config set --resource-group rg-web --name shop --startup-file pm2 serve /home/site/wwwroot 8080 --no-daemon --spa",
                "az webapp update --resource-group rg-web --name shop --set siteConfig.healthCheckPath=/index.html",
            ]
        );
    }

    #[tokio::test]
    async fn test_deploy_app_removes_archive_on_failure() {
        let temp_dir = TempDir::new().unwrap();
        let dist = temp_dir.path().join("dist");
        std::fs::create_dir_all(&dist).unwrap();
        std::fs::write(dist.join("index.html"), "<html></html>").unwrap();

        let runner = Arc::new(
            ScriptedRunner::new()
                .with_tool("az")
                .on("webapp deploy", CommandOutput::failed(1, "")),
        );
        let provider = provider(&runner, temp_dir.path());

        let err = provider.deploy_app().await.unwrap_err();
        assert!(matches!(
            err,
            SiteshipError::Platform(PlatformError::DeploymentFailed { .. })
        ));
        assert_eq!(runner.count("--type zip --clean true"), 1);

        let leftovers: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".zip"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn test_quick_check_truth_table() {
        let cases = [
            ("Running", "200", true),
            ("Running", "503", false),
            ("Stopped", "200", false),
            ("Stopped", "000", false),
            ("running", "200", false),
        ];

        for (state, code, expected) in cases {
            let temp_dir = TempDir::new().unwrap();
            let site = format!(r#"{{"state": "{state}", "defaultHostName": "shop.azurewebsites.net"}}"#);
            let runner = Arc::new(
                ScriptedRunner::new()
                    .with_tool("az")
                    .with_tool("curl")
                    .on("webapp show", CommandOutput::ok(site))
                    .on("curl", CommandOutput::ok(code)),
            );
            let check = provider(&runner, temp_dir.path())
                .quick_check(Duration::from_secs(1), true)
                .await;

            assert_eq!(check.healthy, expected, "state={state} code={code}");
            assert_eq!(check.base_url.as_deref(), Some("https://shop.azurewebsites.net"));
        }
    }

    #[tokio::test]
    async fn test_quick_check_failures_are_unhealthy() {
        let temp_dir = TempDir::new().unwrap();
        let runner = Arc::new(
            ScriptedRunner::new()
                .with_tool("az")
                .on("webapp show", CommandOutput::failed(3, "ResourceNotFound")),
        );
        let check = provider(&runner, temp_dir.path())
            .quick_check(Duration::from_secs(1), false)
            .await;
        assert_eq!(check, QuickCheck::unknown());

        let runner = Arc::new(
            ScriptedRunner::new()
                .with_tool("az")
                .on("webapp show", CommandOutput::ok(r#"{"state": "Running"}"#)),
        );
        let check = provider(&runner, temp_dir.path())
            .quick_check(Duration::from_secs(1), false)
            .await;
        assert_eq!(check, QuickCheck::unknown());
    }

    #[tokio::test]
    async fn test_hostname_and_restart() {
        let temp_dir = TempDir::new().unwrap();
        let runner = Arc::new(
            ScriptedRunner::new()
                .with_tool("az")
                .on("defaultHostName", CommandOutput::ok("shop.azurewebsites.net\n")),
        );
        let provider = provider(&runner, temp_dir.path());

        assert_eq!(provider.get_hostname().await.unwrap(), "shop.azurewebsites.net");
        provider.restart().await.unwrap();
        assert_eq!(runner.count("webapp restart --name shop --resource-group rg-web"), 1);
    }

    #[tokio::test]
    async fn test_empty_hostname_is_not_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let runner = Arc::new(
            ScriptedRunner::new()
                .with_tool("az")
                .on("defaultHostName", CommandOutput::ok("\n")),
        );
        let provider = provider(&runner, temp_dir.path());

        assert_eq!(provider.get_hostname().await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_vfs_check_without_scm_host() {
        let temp_dir = TempDir::new().unwrap();
        let runner = Arc::new(
            ScriptedRunner::new()
                .with_tool("az")
                .on("enabledHostNames", CommandOutput::ok(r#"["shop.azurewebsites.net"]"#)),
        );
        let report = provider(&runner, temp_dir.path()).kudu_vfs_check().await;
        assert_eq!(report, VfsReport::unavailable("SCM host not found"));
        assert_eq!(runner.count("list-publishing-credentials"), 0);
    }

    #[tokio::test]
    async fn test_http_status_delegates_to_prober() {
        let temp_dir = TempDir::new().unwrap();
        let runner = Arc::new(
            ScriptedRunner::new()
                .with_tool("curl")
                .on("curl", CommandOutput::ok("301")),
        );
        let status = provider(&runner, temp_dir.path())
            .http_status("https://shop.example", Duration::from_secs(1))
            .await;
        assert_eq!(status, ProbeStatus::Code(301));
    }
}
