//! Core types for diagnostics and analysis results.

use crate::model::Span;
use miette::{Diagnostic as MietteDiagnostic, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Category attached to every diagnostic this checker reports.
pub const CATEGORY: &str = "logging";

/// A position-anchored finding for a single call site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Source range the finding is anchored to.
    pub span: Span,
    /// Category tag, always [`CATEGORY`].
    pub category: String,
    /// Human-readable message.
    pub message: String,
}

impl Diagnostic {
    /// Creates a diagnostic in the `logging` category.
    #[must_use]
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            category: CATEGORY.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.category, self.message)
    }
}

/// Sink the host hands to the analyzer for reporting diagnostics.
pub trait Reporter {
    /// Records one diagnostic.
    fn report(&mut self, diagnostic: Diagnostic);
}

impl Reporter for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// A diagnostic together with the file it was found in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// File path as supplied by the host.
    pub file: PathBuf,
    /// The reported diagnostic.
    #[serde(flatten)]
    pub diagnostic: Diagnostic,
}

impl Finding {
    /// Creates a new finding.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, diagnostic: Diagnostic) -> Self {
        Self {
            file: file.into(),
            diagnostic,
        }
    }

    /// Line of the finding (1-indexed).
    #[must_use]
    pub fn line(&self) -> usize {
        self.diagnostic.span.start.line
    }

    /// Column of the finding (1-indexed).
    #[must_use]
    pub fn column(&self) -> usize {
        self.diagnostic.span.start.column
    }

    /// Formats the finding for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        format!(
            "{}:{}:{}\n  {}: {}\n",
            self.file.display(),
            self.line(),
            self.column(),
            self.diagnostic.category,
            self.diagnostic.message,
        )
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.file.display(),
            self.line(),
            self.column(),
            self.diagnostic
        )
    }
}

/// Converts a Finding to a miette Diagnostic for rich error display.
#[derive(Debug, thiserror::Error, MietteDiagnostic)]
#[error("{message}")]
pub struct FindingDiagnostic {
    message: String,
    #[label("{category}")]
    span: SourceSpan,
    category: String,
}

impl From<&Finding> for FindingDiagnostic {
    fn from(f: &Finding) -> Self {
        let span = f.diagnostic.span;
        Self {
            message: f.diagnostic.message.clone(),
            span: SourceSpan::from((span.start.offset, span.byte_len())),
            category: f.diagnostic.category.clone(),
        }
    }
}

/// Result of analyzing one or more packages.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All findings, sorted by file, line and column.
    pub findings: Vec<Finding>,
    /// Number of files checked.
    pub files_checked: usize,
    /// Number of logger calls that were verified.
    pub calls_checked: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if anything was reported.
    #[must_use]
    pub fn has_findings(&self) -> bool {
        !self.findings.is_empty()
    }

    /// Returns the findings reported for `file`.
    #[must_use]
    pub fn by_file(&self, file: &std::path::Path) -> Vec<&Finding> {
        self.findings.iter().filter(|f| f.file == file).collect()
    }

    /// Merges another result into this one.
    pub fn extend(&mut self, other: LintResult) {
        self.findings.extend(other.findings);
        self.files_checked += other.files_checked;
        self.calls_checked += other.calls_checked;
        self.sort();
    }

    /// Orders findings by file, line and column.
    pub fn sort(&mut self) {
        self.findings.sort_by(|a, b| {
            a.file
                .cmp(&b.file)
                .then(a.diagnostic.span.start.cmp(&b.diagnostic.span.start))
        });
    }

    /// Formats a summary line.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Found {} issue(s) in {} logger call(s) across {} file(s)",
            self.findings.len(),
            self.calls_checked,
            self.files_checked
        )
    }
}
