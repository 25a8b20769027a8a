//! Output formatting for CLI commands.
//!
//! Text output is colored and tabulated; JSON output is meant for scripts.

use colored::Colorize;
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::workflow::{PreflightReport, WorkflowResult};

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug, Clone, Copy)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Check row for table display.
#[derive(Tabled)]
struct CheckRow {
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Check")]
    name: String,
    #[tabled(rename = "Result")]
    result: String,
    #[tabled(rename = "Message")]
    message: String,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the outcome of a workflow run.
    #[must_use]
    pub fn format_result(&self, result: &WorkflowResult) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(result).unwrap_or_default(),
            OutputFormat::Text => {
                let mark = if result.ok { "✓".green() } else { "✗".red() };
                format!("{mark} [{}] {}", result.workflow, result.message)
            }
        }
    }

    /// Formats validation and policy results.
    #[must_use]
    pub fn format_preflight(&self, report: &PreflightReport) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report).unwrap_or_default(),
            OutputFormat::Text => Self::format_preflight_text(report),
        }
    }

    fn format_preflight_text(report: &PreflightReport) -> String {
        let rows: Vec<CheckRow> = report
            .validations
            .iter()
            .map(|v| Self::row("validation", &v.name, v.ok, &v.message))
            .chain(
                report
                    .policies
                    .iter()
                    .map(|p| Self::row("policy", &p.name, p.ok, &p.message)),
            )
            .collect();

        let mut output = String::new();
        if rows.is_empty() {
            output.push_str("No checks selected.\n");
            return output;
        }

        output.push_str(&Table::new(rows).to_string());
        output.push('\n');

        let failed = report.validations.iter().filter(|v| !v.ok).count()
            + report.policies.iter().filter(|p| !p.ok).count();
        let summary = if failed == 0 {
            "all checks passed".green().to_string()
        } else {
            format!("{failed} check(s) failed").red().to_string()
        };
        let _ = writeln!(output, "\nPreflight: {summary}");

        output
    }

    fn row(kind: &'static str, name: &str, ok: bool, message: &str) -> CheckRow {
        CheckRow {
            kind,
            name: name.to_string(),
            result: if ok { "pass".green().to_string() } else { "fail".red().to_string() },
            message: message.to_string(),
        }
    }

    /// Formats the registered workflow names.
    #[must_use]
    pub fn format_workflows(&self, names: &[&str]) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(names).unwrap_or_default(),
            OutputFormat::Text => {
                let mut output = String::from("Registered workflows:\n");
                for name in names {
                    let _ = writeln!(output, "  - {name}");
                }
                output
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PolicyResult;
    use crate::validation::ValidationResult;

    fn report() -> PreflightReport {
        PreflightReport {
            validations: vec![ValidationResult::pass("azure.cli.available", "Azure CLI found at /usr/bin/az.")],
            policies: vec![PolicyResult::fail("policy.location.defined", "Location is empty.")],
        }
    }

    #[test]
    fn test_result_json() {
        let formatter = OutputFormatter::new(OutputFormat::Json);
        let result = WorkflowResult::success("azure.app_service.deploy", "Deployment completed successfully.");

        let value: serde_json::Value = serde_json::from_str(&formatter.format_result(&result)).unwrap();
        assert_eq!(value["workflow"], "azure.app_service.deploy");
        assert_eq!(value["ok"], true);
    }

    #[test]
    fn test_preflight_text_lists_every_check() {
        colored::control::set_override(false);
        let text = OutputFormatter::new(OutputFormat::Text).format_preflight(&report());

        assert!(text.contains("azure.cli.available"));
        assert!(text.contains("policy.location.defined"));
        assert!(text.contains("1 check(s) failed"));
    }

    #[test]
    fn test_preflight_json() {
        let json = OutputFormatter::new(OutputFormat::Json).format_preflight(&report());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["policies"][0]["ok"], false);
        assert_eq!(value["validations"][0]["name"], "azure.cli.available");
    }

    #[test]
    fn test_workflow_list() {
        let text = OutputFormatter::new(OutputFormat::Text).format_workflows(&["azure.app_service.deploy"]);
        assert_eq!(text, "Registered workflows:\n  - azure.app_service.deploy\n");

        let json = OutputFormatter::new(OutputFormat::Json).format_workflows(&["a", "b"]);
        assert_eq!(serde_json::from_str::<Vec<String>>(&json).unwrap(), vec!["a", "b"]);
    }
}
