//! Core analyzer matching logger calls and verifying their arguments.

use crate::config::Config;
use crate::context::CallContext;
use crate::model::{CallExpr, FuncSymbol, PackageUnit, SourceFile};
use crate::rules::{Ruleset, RulesetList, RulesError};
use crate::types::{Diagnostic, Finding, LintResult, Reporter};
use crate::verify::{verify, Checks};

use std::collections::BTreeSet;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, trace};

/// Errors that can occur while constructing an analyzer.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Custom rules could not be read or parsed.
    #[error(transparent)]
    Rules(#[from] RulesError),

    /// A disabled dialect name is not known.
    #[error("unknown logger: {name:?}, expected one of: {}", .known.join(", "))]
    UnknownDialect {
        /// The unknown name.
        name: String,
        /// Every known dialect name.
        known: Vec<String>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Debug, Default)]
pub struct AnalyzerBuilder {
    builtin: RulesetList,
    rules: Vec<String>,
    rule_file: Option<PathBuf>,
    disabled: BTreeSet<String>,
    checks: Checks,
}

impl AnalyzerBuilder {
    /// Creates a new builder with no built-in rulesets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the built-in rulesets, consulted before custom ones.
    #[must_use]
    pub fn builtin(mut self, rulesets: RulesetList) -> Self {
        self.builtin = rulesets;
        self
    }

    /// Adds a custom rule.
    #[must_use]
    pub fn rule(mut self, rule: impl Into<String>) -> Self {
        self.rules.push(rule.into());
        self
    }

    /// Adds multiple custom rules.
    #[must_use]
    pub fn rules<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules.extend(rules.into_iter().map(Into::into));
        self
    }

    /// Sets a rule file. It takes precedence over rules added with
    /// [`rule`](Self::rule).
    #[must_use]
    pub fn rule_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.rule_file = Some(path.into());
        self
    }

    /// Disables a dialect by name.
    #[must_use]
    pub fn disable(mut self, name: impl Into<String>) -> Self {
        self.disabled.insert(name.into());
        self
    }

    /// Disables multiple dialects by name.
    #[must_use]
    pub fn disables<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disabled.extend(names.into_iter().map(Into::into));
        self
    }

    /// Requires keys to be constant ASCII strings.
    #[must_use]
    pub fn require_string_key(mut self, enabled: bool) -> Self {
        self.checks.require_string_key = enabled;
        self
    }

    /// Rejects printf-style directives in messages.
    #[must_use]
    pub fn no_printf_like(mut self, enabled: bool) -> Self {
        self.checks.no_printf_like = enabled;
        self
    }

    /// Applies a configuration on top of the current settings.
    #[must_use]
    pub fn config(mut self, config: &Config) -> Self {
        self.disabled.extend(config.disable.iter().cloned());
        self.rules.extend(config.rules.iter().cloned());
        if let Some(path) = &config.rule_file {
            self.rule_file = Some(path.clone());
        }
        self.checks.require_string_key |= config.require_string_key;
        self.checks.no_printf_like |= config.no_printf_like;
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the rule file cannot be read, a custom rule is
    /// malformed, or a disabled name matches no ruleset.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let custom = match &self.rule_file {
            Some(path) => {
                if !self.rules.is_empty() {
                    debug!(
                        "Rule file {} takes precedence over {} inline rule(s)",
                        path.display(),
                        self.rules.len()
                    );
                }
                RulesetList::from_file(path)?
            }
            None => RulesetList::parse(&self.rules)?,
        };
        debug!("Loaded {} custom ruleset(s)", custom.len());

        let rulesets = self.builtin.merged(&custom);
        if let Some(name) = self.disabled.iter().find(|name| !rulesets.has_name(name)) {
            return Err(AnalyzerError::UnknownDialect {
                name: name.clone(),
                known: rulesets.names().into_iter().map(String::from).collect(),
            });
        }

        Ok(Analyzer {
            rulesets,
            disabled: self.disabled,
            checks: self.checks,
        })
    }
}

/// Matches logger calls against rulesets and verifies their key-value
/// arguments.
///
/// The analyzer is immutable once built, so one instance can be shared
/// across threads analyzing different packages.
///
/// Use [`Analyzer::builder()`] to construct an instance.
#[derive(Debug)]
pub struct Analyzer {
    rulesets: RulesetList,
    disabled: BTreeSet<String>,
    checks: Checks,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns every ruleset, built-in first.
    #[must_use]
    pub fn rulesets(&self) -> &RulesetList {
        &self.rulesets
    }

    /// Returns the enabled verification stages.
    #[must_use]
    pub fn checks(&self) -> Checks {
        self.checks
    }

    /// Checks if a dialect is disabled.
    #[must_use]
    pub fn is_disabled(&self, name: &str) -> bool {
        self.disabled.contains(name)
    }

    /// Returns the first enabled ruleset matching the callee.
    #[must_use]
    pub fn matching_ruleset(&self, func: &FuncSymbol) -> Option<&Ruleset> {
        func.package.as_ref()?;
        self.rulesets
            .iter()
            .filter(|rs| !self.is_disabled(rs.name()))
            .find(|rs| rs.matches(func))
    }

    /// Returns true if the callee is a logger function of an enabled dialect.
    #[must_use]
    pub fn is_valid_logger_call(&self, func: &FuncSymbol) -> bool {
        self.matching_ruleset(func).is_some()
    }

    /// Verifies one call, reporting findings to `reporter`.
    ///
    /// Returns true if the call was recognized as a logger call and verified.
    pub fn check_call(&self, call: &CallExpr, reporter: &mut dyn Reporter) -> bool {
        let Some(func) = call.callee.as_ref() else {
            return false;
        };
        let Some(ruleset) = self.matching_ruleset(func) else {
            return false;
        };
        let ctx = match CallContext::new(call) {
            Ok(ctx) => ctx,
            Err(reason) => {
                trace!(callee = %func.name, dialect = ruleset.name(), %reason, "Skipping logger call");
                return false;
            }
        };

        let key_values = ruleset.dialect().extract_key_values(&ctx);
        for diagnostic in verify(&ctx, &key_values, self.checks) {
            reporter.report(diagnostic);
        }
        true
    }

    /// Verifies every call in a file.
    #[must_use]
    pub fn check_file(&self, file: &SourceFile) -> LintResult {
        debug!("Analyzing: {}", file.path.display());

        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let mut calls_checked = 0;
        for expr in &file.exprs {
            expr.for_each_call(&mut |call| {
                if self.check_call(call, &mut diagnostics) {
                    calls_checked += 1;
                }
            });
        }

        let mut result = LintResult::new();
        result.findings = diagnostics
            .into_iter()
            .map(|d| Finding::new(file.path.clone(), d))
            .collect();
        result.files_checked = 1;
        result.calls_checked = calls_checked;
        result.sort();
        result
    }

    /// Analyzes every file of a package and returns the results.
    #[must_use]
    pub fn analyze(&self, unit: &PackageUnit) -> LintResult {
        info!("Starting analysis of package {}", unit.path);

        let mut result = LintResult::new();
        for file in &unit.files {
            result.extend(self.check_file(file));
        }

        info!(
            "Analysis complete: {} findings in {} logger calls across {} files",
            result.findings.len(),
            result.calls_checked,
            result.files_checked
        );
        result
    }
}
