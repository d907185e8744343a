//! Shared output formatting for lint results.

use anyhow::Result;
use loggercheck_core::{Finding, FindingDiagnostic, LintResult};
use miette::{NamedSource, Report};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::PathBuf;

use crate::OutputFormat;

/// Print lint results in the specified format.
///
/// `sources` maps file paths to their contents; findings in those files are
/// rendered with a source snippet in text mode.
pub fn print(
    result: &LintResult,
    sources: &HashMap<PathBuf, String>,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result, sources),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print!("{}", render_compact(result)),
    }
    Ok(())
}

fn print_text(result: &LintResult, sources: &HashMap<PathBuf, String>) {
    for finding in &result.findings {
        match sources.get(&finding.file) {
            Some(content) => println!("{:?}", snippet(finding, content)),
            None => println!("{}", finding.format()),
        }
    }

    let summary_color = if result.has_findings() {
        "\x1b[31m"
    } else {
        "\x1b[32m"
    };
    println!("{summary_color}{}\x1b[0m", result.summary());
}

/// Wraps a finding into a miette report carrying its source file.
fn snippet(finding: &Finding, content: &str) -> Report {
    let source = NamedSource::new(finding.file.display().to_string(), content.to_string());
    Report::new(FindingDiagnostic::from(finding)).with_source_code(source)
}

fn print_json(result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn render_compact(result: &LintResult) -> String {
    let mut output = String::new();
    for finding in &result.findings {
        let _ = writeln!(output, "{finding}");
    }
    output
}
