//! Command-line interface for siteship.

mod commands;
mod output;

pub use commands::{Cli, Commands, OutputFormat, OverrideArgs};
pub use output::OutputFormatter;
