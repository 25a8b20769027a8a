//! Static server config and deployment archive creation.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use crate::config::WorkflowContext;
use crate::error::{BuildError, Result};

/// Name of the static server config copied into the build output.
pub const STATIC_CONFIG_FILE: &str = "web.config";

/// What [`copy_static_config`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaticConfigOutcome {
    /// The file was copied to this destination.
    Copied(PathBuf),
    /// The file is absent and the runtime does not need it.
    NotRequired,
}

/// Copies `web.config` from the workspace root into the build output.
///
/// Linux runtimes (identifiers containing `:`) do not need the file, so its
/// absence is only fatal for other runtimes.
///
/// # Errors
///
/// Returns an error if the file is required but missing, or the copy fails.
pub fn copy_static_config(context: &WorkflowContext) -> Result<StaticConfigOutcome> {
    let source = context.workspace_file(STATIC_CONFIG_FILE);

    if !source.is_file() {
        if context.config.is_linux_runtime() {
            info!("Linux runtime detected; skipping {STATIC_CONFIG_FILE} copy.");
            return Ok(StaticConfigOutcome::NotRequired);
        }
        return Err(BuildError::StaticConfigMissing { path: source }.into());
    }

    let dist = context.dist_path();
    fs::create_dir_all(&dist)?;
    let destination = dist.join(STATIC_CONFIG_FILE);
    fs::copy(&source, &destination)?;

    info!("Copied {STATIC_CONFIG_FILE} to {}", destination.display());
    Ok(StaticConfigOutcome::Copied(destination))
}

/// Returns the archive file name for a point in time.
#[must_use]
pub fn archive_name(at: DateTime<Utc>) -> String {
    format!("deploy_{}.zip", at.format("%Y%m%d_%H%M%S"))
}

/// A zip archive of the build output, deleted when dropped.
#[derive(Debug)]
pub struct DeploymentPackage {
    /// Archive location.
    path: PathBuf,
    /// Entry names, relative with forward slashes, in archive order.
    entries: Vec<String>,
    /// SHA-256 over entry names and contents.
    content_digest: String,
}

impl DeploymentPackage {
    /// Packages `source_dir` into a timestamped archive in `output_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if `source_dir` is missing or the archive cannot be
    /// written.
    pub fn create(source_dir: &Path, output_dir: &Path) -> Result<Self> {
        Self::create_at(source_dir, output_dir.join(archive_name(Utc::now())))
    }

    /// Packages `source_dir` into the archive at `path`, replacing any
    /// existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if `source_dir` is missing or the archive cannot be
    /// written.
    pub fn create_at(source_dir: &Path, path: PathBuf) -> Result<Self> {
        if !source_dir.is_dir() {
            return Err(BuildError::OutputMissing {
                path: source_dir.to_path_buf(),
            }
            .into());
        }

        if path.exists() {
            fs::remove_file(&path)?;
        }

        let files = collect_files(source_dir, &path)?;
        if files.is_empty() {
            warn!("Build output {} is empty", source_dir.display());
        }

        // Owned from here on so a failed write still removes the partial file.
        let mut package = Self {
            path,
            entries: Vec::with_capacity(files.len()),
            content_digest: String::new(),
        };

        let archive_path = package.path.clone();
        let archive_err = |e: &dyn std::fmt::Display| BuildError::Archive {
            path: archive_path.clone(),
            message: e.to_string(),
        };

        let file = File::create(&package.path)?;
        let mut zip = zip::ZipWriter::new(file);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut hasher = Sha256::new();

        for (name, absolute) in files {
            zip.start_file(name.as_str(), options).map_err(|e| archive_err(&e))?;
            hasher.update(name.as_bytes());
            hasher.update([0u8]);

            let mut reader = HashingReader {
                inner: File::open(&absolute)?,
                hasher: &mut hasher,
            };
            let written = io::copy(&mut reader, &mut zip)?;
            hasher.update(written.to_le_bytes());
            package.entries.push(name);
        }

        zip.finish().map_err(|e| archive_err(&e))?;
        package.content_digest = hex::encode(hasher.finalize());

        info!(
            "Created package {} ({} files, sha256 {})",
            package.path.display(),
            package.entries.len(),
            &package.content_digest[..12]
        );
        Ok(package)
    }

    /// Returns the archive path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the archive entry names.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Returns the content digest (independent of timestamps and file name).
    #[must_use]
    pub fn content_digest(&self) -> &str {
        &self.content_digest
    }
}

impl Drop for DeploymentPackage {
    fn drop(&mut self) {
        if !self.path.exists() {
            return;
        }
        match fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed package {}", self.path.display()),
            Err(e) => warn!("Failed to remove package {}: {e}", self.path.display()),
        }
    }
}

/// Feeds everything read through it into a SHA-256 hasher.
struct HashingReader<'a, R> {
    inner: R,
    hasher: &'a mut Sha256,
}

impl<R: Read> Read for HashingReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }
}

/// Lists files under `root` as (entry name, absolute path), sorted by path,
/// skipping `exclude`. Symlinked files are packaged with their target's
/// contents; symlinked directories are not descended into.
fn collect_files(root: &Path, exclude: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| BuildError::Archive {
            path: root.to_path_buf(),
            message: e.to_string(),
        })?;
        if entry.path() == exclude {
            continue;
        }
        if entry.path_is_symlink() && !entry.path().is_file() {
            if !entry.path().exists() {
                warn!("Skipping dangling link {}", entry.path().display());
            }
            continue;
        }
        if !entry.path().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(root).map_err(|e| BuildError::Archive {
            path: root.to_path_buf(),
            message: e.to_string(),
        })?;
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        files.push((name, entry.into_path()));
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeploymentConfig;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn context(runtime: &str, root: &Path) -> WorkflowContext {
        let config = DeploymentConfig {
            runtime: runtime.to_string(),
            ..DeploymentConfig::default()
        };
        WorkflowContext::new(config, root)
    }

    fn write_build_output(root: &Path) -> PathBuf {
        let dist = root.join("dist");
        fs::create_dir_all(dist.join("assets")).unwrap();
        fs::write(dist.join("index.html"), "<script src=\"/assets/app.js\"></script>").unwrap();
        fs::write(dist.join("assets/app.js"), "console.log(1)").unwrap();
        fs::write(dist.join("assets/app.css"), "body{}").unwrap();
        dist
    }

    #[test]
    fn test_static_config_skipped_for_linux_runtime() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context("NODE:20-lts", temp_dir.path());

        let outcome = copy_static_config(&ctx).unwrap();
        assert_eq!(outcome, StaticConfigOutcome::NotRequired);
        assert!(!ctx.dist_path().exists());
    }

    #[test]
    fn test_static_config_required_for_windows_runtime() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context("node|20-lts", temp_dir.path());

        let err = copy_static_config(&ctx).unwrap_err();
        assert!(matches!(
            err,
            crate::error::SiteshipError::Build(BuildError::StaticConfigMissing { .. })
        ));
    }

    #[test]
    fn test_static_config_copied_and_dist_created() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(STATIC_CONFIG_FILE), "<configuration/>").unwrap();
        let ctx = context("NODE:20-lts", temp_dir.path());

        let outcome = copy_static_config(&ctx).unwrap();
        let destination = ctx.dist_path().join(STATIC_CONFIG_FILE);
        assert_eq!(outcome, StaticConfigOutcome::Copied(destination.clone()));
        assert_eq!(fs::read_to_string(destination).unwrap(), "<configuration/>");
    }

    #[test]
    fn test_archive_name_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(archive_name(at), "deploy_20240309_070501.zip");
    }

    #[test]
    fn test_package_entries_and_cleanup() {
        let temp_dir = TempDir::new().unwrap();
        let dist = write_build_output(temp_dir.path());

        let package = DeploymentPackage::create(&dist, temp_dir.path()).unwrap();
        let path = package.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(path.parent(), Some(temp_dir.path()));
        assert_eq!(
            package.entries(),
            &["assets/app.css", "assets/app.js", "index.html"]
        );

        let archive = zip::ZipArchive::new(File::open(&path).unwrap()).unwrap();
        let mut names: Vec<&str> = archive.file_names().collect();
        names.sort_unstable();
        assert_eq!(names, vec!["assets/app.css", "assets/app.js", "index.html"]);

        drop(archive);
        drop(package);
        assert!(!path.exists());
    }

    #[test]
    fn test_package_contents_are_deterministic() {
        let temp_dir = TempDir::new().unwrap();
        let dist = write_build_output(temp_dir.path());

        let first = DeploymentPackage::create_at(&dist, temp_dir.path().join("a.zip")).unwrap();
        let second = DeploymentPackage::create_at(&dist, temp_dir.path().join("b.zip")).unwrap();
        assert_eq!(first.entries(), second.entries());
        assert_eq!(first.content_digest(), second.content_digest());

        fs::write(dist.join("index.html"), "changed").unwrap();
        let third = DeploymentPackage::create_at(&dist, temp_dir.path().join("c.zip")).unwrap();
        assert_ne!(first.content_digest(), third.content_digest());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_files_are_packaged() {
        use std::os::unix::fs::symlink;

        let temp_dir = TempDir::new().unwrap();
        let dist = temp_dir.path().join("dist");
        fs::create_dir_all(&dist).unwrap();
        fs::write(dist.join("index.html"), "<html></html>").unwrap();
        fs::write(temp_dir.path().join("shared.js"), "export const shared = 1;").unwrap();
        symlink("../shared.js", dist.join("vendor.js")).unwrap();

        let other = temp_dir.path().join("other");
        fs::create_dir_all(&other).unwrap();
        fs::write(other.join("extra.txt"), "extra").unwrap();
        symlink(&other, dist.join("linked")).unwrap();

        let package = DeploymentPackage::create_at(&dist, temp_dir.path().join("out.zip")).unwrap();
        assert_eq!(package.entries(), &["index.html", "vendor.js"]);

        let mut archive = zip::ZipArchive::new(File::open(package.path()).unwrap()).unwrap();
        let mut contents = String::new();
        archive.by_name("vendor.js").unwrap().read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "export const shared = 1;");
    }

    #[test]
    fn test_existing_archive_is_replaced() {
        let temp_dir = TempDir::new().unwrap();
        let dist = write_build_output(temp_dir.path());
        let path = temp_dir.path().join("deploy_fixed.zip");
        fs::write(&path, "stale").unwrap();

        let package = DeploymentPackage::create_at(&dist, path.clone()).unwrap();
        assert!(zip::ZipArchive::new(File::open(&path).unwrap()).is_ok());
        assert_eq!(package.entries().len(), 3);
    }

    #[test]
    fn test_missing_output_dir_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let result = DeploymentPackage::create(&temp_dir.path().join("dist"), temp_dir.path());
        assert!(matches!(
            result,
            Err(crate::error::SiteshipError::Build(BuildError::OutputMissing { .. }))
        ));
    }
}
