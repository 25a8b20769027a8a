//! Scripted command runner for unit tests.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::Result;

use super::runner::{CommandOutput, CommandRunner, Invocation};

/// A response rule: the first rule whose pattern occurs in the command line
/// answers. The last queued response repeats.
#[derive(Debug)]
struct Rule {
    pattern: String,
    responses: Mutex<VecDeque<CommandOutput>>,
}

/// Records every command and answers from scripted rules. Unmatched commands
/// succeed with empty output.
#[derive(Debug, Default)]
pub(crate) struct ScriptedRunner {
    tools: HashMap<String, PathBuf>,
    rules: Vec<Rule>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Makes `tool` resolvable on the fake `PATH`.
    pub(crate) fn with_tool(mut self, tool: &str) -> Self {
        self.tools
            .insert(tool.to_string(), PathBuf::from(format!("/usr/bin/{tool}")));
        self
    }

    pub(crate) fn on(self, pattern: &str, output: CommandOutput) -> Self {
        self.on_sequence(pattern, vec![output])
    }

    pub(crate) fn on_sequence(mut self, pattern: &str, outputs: Vec<CommandOutput>) -> Self {
        self.rules.push(Rule {
            pattern: pattern.to_string(),
            responses: Mutex::new(outputs.into()),
        });
        self
    }

    /// Command lines run so far, in order.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of recorded command lines containing `pattern`.
    pub(crate) fn count(&self, pattern: &str) -> usize {
        self.calls().iter().filter(|c| c.contains(pattern)).count()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    fn locate(&self, tool: &str) -> Option<PathBuf> {
        self.tools.get(tool).cloned()
    }

    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        let line = invocation.command_line();
        self.calls.lock().unwrap().push(line.clone());

        let Some(rule) = self.rules.iter().find(|r| line.contains(&r.pattern)) else {
            return Ok(CommandOutput::ok(""));
        };

        let mut responses = rule.responses.lock().unwrap();
        let output = if responses.len() > 1 {
            responses.pop_front()
        } else {
            responses.front().cloned()
        };
        Ok(output.unwrap_or_default())
    }
}
