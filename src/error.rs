//! Error types for the siteship deployment tool.
//!
//! Only fatal conditions are errors. Verification steps (quick-check, HTTP
//! probes, VFS diagnostics) report their outcome as plain values and never
//! surface here.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the siteship deployment tool.
#[derive(Debug, Error)]
pub enum SiteshipError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A validation or policy gate stopped the workflow.
    #[error(transparent)]
    Gate(#[from] GateError),

    /// Platform CLI and resource errors.
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Build and packaging errors.
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be parsed.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// Validation failed.
    #[error("Configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation error.
        message: String,
        /// Field that failed validation.
        field: Option<String>,
    },

    /// The selected workflow is not registered.
    #[error("Workflow '{name}' not found. Available: {available}")]
    UnknownWorkflow {
        /// Requested workflow name.
        name: String,
        /// Comma separated list of registered workflows.
        available: String,
    },

    /// The configured IaC tool is not registered.
    #[error("Unknown IaC tool '{name}'.")]
    UnknownIacTool {
        /// Requested tool name, as supplied.
        name: String,
    },
}

/// Pre-deployment gate failures.
#[derive(Debug, Error)]
pub enum GateError {
    /// At least one selected validator failed.
    #[error("Pre-deploy validation failed.")]
    ValidationFailed {
        /// Names of the failing validators.
        failed: Vec<String>,
    },

    /// At least one selected policy check failed.
    #[error("Policy checks failed.")]
    PolicyFailed {
        /// Names of the failing policy checks.
        failed: Vec<String>,
    },
}

/// Platform CLI and cloud resource errors.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The platform CLI is not installed.
    #[error("Azure CLI is not installed. Install from https://aka.ms/installazurecliwindows")]
    NotInstalled,

    /// Interactive login did not succeed.
    #[error("Azure login failed")]
    LoginFailed,

    /// A platform command exited unsuccessfully.
    #[error("Command `{command}` failed with exit code {code}: {stderr}")]
    CommandFailed {
        /// The command line that was run.
        command: String,
        /// Exit code (-1 when terminated by a signal).
        code: i32,
        /// Captured standard error, if any.
        stderr: String,
    },

    /// A platform command returned output that could not be understood.
    #[error("Unexpected output from `{command}`: {message}")]
    InvalidOutput {
        /// The command line that was run.
        command: String,
        /// Description of the problem.
        message: String,
    },

    /// Creating a missing resource failed.
    #[error("Failed to create {kind} '{name}': {reason}")]
    ResourceCreationFailed {
        /// Kind of resource (resource group, plan, web app).
        kind: String,
        /// Resource name.
        name: String,
        /// Reason reported by the create step.
        reason: String,
    },

    /// The package upload was rejected.
    #[error("Deployment of '{archive}' failed with exit code {code}")]
    DeploymentFailed {
        /// Archive that was being deployed.
        archive: PathBuf,
        /// Exit code of the deploy command.
        code: i32,
    },
}

/// Build, static config and packaging errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// No usable build tool was found.
    #[error("Neither yarn nor npm found on PATH. Please install Node.js tooling.")]
    ToolchainMissing,

    /// The build tool exited unsuccessfully.
    #[error("Build command `{command}` failed with exit code {code}")]
    Failed {
        /// The build command line.
        command: String,
        /// Exit code (-1 when terminated by a signal).
        code: i32,
    },

    /// The static server config is required but missing.
    #[error("web.config not found at {path}")]
    StaticConfigMissing {
        /// Expected location of the file.
        path: PathBuf,
    },

    /// The build output directory does not exist.
    #[error("Build output directory not found: {path}")]
    OutputMissing {
        /// Expected build output directory.
        path: PathBuf,
    },

    /// Writing the deployment archive failed.
    #[error("Failed to create package {path}: {message}")]
    Archive {
        /// Archive path.
        path: PathBuf,
        /// Description of the failure.
        message: String,
    },
}

/// Result type alias for siteship operations.
pub type Result<T> = std::result::Result<T, SiteshipError>;

impl SiteshipError {
    /// Creates a new internal error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if this error was raised by a pre-deployment gate.
    #[must_use]
    pub const fn is_gate(&self) -> bool {
        matches!(self, Self::Gate(_))
    }
}

impl ConfigError {
    /// Creates a validation error for a specific field.
    #[must_use]
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Creates a parse error with an optional source location.
    #[must_use]
    pub fn parse(message: impl Into<String>, location: Option<String>) -> Self {
        Self::ParseError {
            message: message.into(),
            location,
        }
    }
}

impl PlatformError {
    /// Creates a command failure error.
    #[must_use]
    pub fn command_failed(command: impl Into<String>, code: i32, stderr: impl Into<String>) -> Self {
        Self::CommandFailed {
            command: command.into(),
            code,
            stderr: stderr.into(),
        }
    }

    /// Creates an invalid output error.
    #[must_use]
    pub fn invalid_output(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOutput {
            command: command.into(),
            message: message.into(),
        }
    }
}
