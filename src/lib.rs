// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # Siteship
//!
//! Builds a static front-end and deploys it to Azure App Service, driven by
//! the `az` CLI.
//!
//! ## Overview
//!
//! A deployment run is a named workflow over a [`WorkflowContext`]:
//!
//! - Local validations and governance policies gate the run
//! - The CLI is authenticated and optional IaC tooling runs
//! - A quick-check can skip the run when the site is already healthy
//! - The app is built, resources are ensured idempotently, and the build
//!   output is zipped and uploaded
//! - The live site is verified over HTTP and through the SCM file system
//!
//! ## Modules
//!
//! - [`config`]: Configuration parsing, overrides and validation
//! - [`exec`]: External process execution
//! - [`checks`]: Named check registries and selection
//! - [`validation`]: Pre-flight validators
//! - [`policy`]: Governance policies
//! - [`iac`]: Infrastructure-as-code orchestrators
//! - [`build`]: Front-end build and packaging
//! - [`azure`]: Azure CLI wrapper and App Service provider
//! - [`workflow`]: Workflows, registry and decider
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```yaml
//! # config/local.yaml
//! resource_group: rg-shop
//! web_app_name: shop-web
//! location: centralus
//! sku: B1
//! runtime: "NODE:20-lts"
//! quick_check: true
//! validations:
//!   - azure.cli.available
//!   - node.build.tools
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod azure;
pub mod build;
pub mod checks;
pub mod cli;
pub mod config;
pub mod error;
pub mod exec;
pub mod iac;
pub mod policy;
pub mod validation;
pub mod workflow;

// ============================================================================
// Re-exports
// ============================================================================

pub use azure::{AppServiceProvider, AzureCli};
pub use cli::{Cli, Commands, OutputFormatter};
pub use config::{ConfigParser, ConfigValidator, DeploymentConfig, WorkflowContext};
pub use error::{Result, SiteshipError};
pub use exec::{CommandRunner, SystemRunner};
pub use workflow::{
    AppServiceDeployWorkflow, Workflow, WorkflowDecider, WorkflowRegistry, WorkflowResult,
};
