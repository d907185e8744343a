//! Rulesets and the ruleset registry.

use super::{parse_func_rule, FuncRule, RulesError};
use crate::dialect::Dialect;
use crate::model::FuncSymbol;
use std::collections::HashMap;
use std::path::Path;

/// Name given to rulesets loaded from user-supplied rules.
pub const CUSTOM_RULESET_NAME: &str = "custom";

/// Rules sharing one declaring import path, under one dialect name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ruleset {
    name: String,
    package_import: String,
    dialect: Dialect,
    rules: Vec<FuncRule>,
    indices_by_name: HashMap<String, Vec<usize>>,
}

impl Ruleset {
    /// Creates a `custom` ruleset using the general dialect.
    #[must_use]
    pub fn new(package_import: impl Into<String>, rules: Vec<FuncRule>) -> Self {
        let mut indices_by_name: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, rule) in rules.iter().enumerate() {
            indices_by_name
                .entry(rule.name().to_string())
                .or_default()
                .push(i);
        }
        Self {
            name: CUSTOM_RULESET_NAME.to_string(),
            package_import: package_import.into(),
            dialect: Dialect::General,
            rules,
            indices_by_name,
        }
    }

    /// Renames the ruleset.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the argument extraction dialect.
    #[must_use]
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Dialect name, e.g. `zap` or `custom`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declaring import path shared by every rule.
    #[must_use]
    pub fn package_import(&self) -> &str {
        &self.package_import
    }

    /// Argument extraction dialect.
    #[must_use]
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Rules in declaration order.
    #[must_use]
    pub fn rules(&self) -> &[FuncRule] {
        &self.rules
    }

    /// Returns true if the callee is declared by this ruleset's package,
    /// directly or through a vendored copy.
    #[must_use]
    pub fn owns_package(&self, package: &str) -> bool {
        package == self.package_import
            || package
                .strip_suffix(self.package_import.as_str())
                .is_some_and(|head| head.ends_with("/vendor/"))
    }

    /// Returns true if any rule matches the resolved callee.
    #[must_use]
    pub fn matches(&self, func: &FuncSymbol) -> bool {
        let Some(package) = func.package.as_deref() else {
            return false;
        };
        if !self.owns_package(package) {
            return false;
        }
        let Some(indices) = self.indices_by_name.get(&func.name) else {
            return false;
        };
        indices
            .iter()
            .filter_map(|&i| self.rules.get(i))
            .any(|rule| rule.matches_signature(&func.signature))
    }
}

/// Ordered registry of rulesets.
///
/// Extending the registry produces a new list; a list is never mutated
/// once an analyzer holds it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RulesetList(Vec<Ruleset>);

impl RulesetList {
    /// Creates a registry from rulesets, keeping their order.
    #[must_use]
    pub fn new(rulesets: Vec<Ruleset>) -> Self {
        Self(rulesets)
    }

    /// Parses rule lines into `custom` rulesets grouped by import path.
    ///
    /// Lines are trimmed; blank lines and `#` comments are skipped. Groups
    /// are ordered by the first occurrence of their import path.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::Parse`] naming the 1-based line of the first
    /// malformed rule.
    pub fn parse<I, S>(lines: I) -> Result<Self, RulesError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut groups: Vec<(String, Vec<FuncRule>)> = Vec::new();
        let mut group_index: HashMap<String, usize> = HashMap::new();

        for (i, line) in lines.into_iter().enumerate() {
            let line = line.as_ref().trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (import, rule) =
                parse_func_rule(line).map_err(|source| RulesError::Parse { line: i + 1, source })?;
            match group_index.get(&import) {
                Some(&idx) => groups[idx].1.push(rule),
                None => {
                    group_index.insert(import.clone(), groups.len());
                    groups.push((import, vec![rule]));
                }
            }
        }

        Ok(Self(
            groups
                .into_iter()
                .map(|(import, rules)| Ruleset::new(import, rules))
                .collect(),
        ))
    }

    /// Reads and parses a rule file.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::Read`] if the file cannot be read, or
    /// [`RulesError::Parse`] for the first malformed line.
    pub fn from_file(path: &Path) -> Result<Self, RulesError> {
        let content = std::fs::read_to_string(path).map_err(|source| RulesError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(content.lines())
    }

    /// Deduplicated, sorted ruleset names.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.0.iter().map(Ruleset::name).collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Returns true if some ruleset carries `name`.
    #[must_use]
    pub fn has_name(&self, name: &str) -> bool {
        self.0.iter().any(|rs| rs.name() == name)
    }

    /// Returns a new list holding `self` followed by `other`.
    #[must_use]
    pub fn merged(&self, other: &RulesetList) -> RulesetList {
        let mut rulesets = Vec::with_capacity(self.0.len() + other.0.len());
        rulesets.extend(self.0.iter().cloned());
        rulesets.extend(other.0.iter().cloned());
        Self(rulesets)
    }

    /// Iterates rulesets in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Ruleset> {
        self.0.iter()
    }

    /// Number of rulesets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a RulesetList {
    type Item = &'a Ruleset;
    type IntoIter = std::slice::Iter<'a, Ruleset>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for RulesetList {
    type Item = Ruleset;
    type IntoIter = std::vec::IntoIter<Ruleset>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
