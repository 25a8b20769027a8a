//! Configuration module for the siteship deployment tool.
//!
//! This module handles all configuration-related functionality:
//! - Parsing `config/local.yaml` and merging environment and CLI overrides
//! - Structural validation of configuration values
//! - The per-run [`WorkflowContext`]

mod context;
mod parser;
mod spec;
mod validator;

pub use context::WorkflowContext;
pub use parser::{ConfigParser, DEFAULT_CONFIG_PATH, ENV_PREFIX};
pub use spec::{ConfigOverrides, DeploymentConfig};
pub use validator::{ConfigValidator, FieldError, ValidationReport};
