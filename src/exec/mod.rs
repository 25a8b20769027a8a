//! Process execution for external tools.

mod runner;
#[cfg(test)]
pub(crate) mod testing;

pub use runner::{CommandOutput, CommandRunner, Invocation, SystemRunner, null_device};
