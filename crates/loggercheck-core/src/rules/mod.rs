//! Rule language identifying logger functions and methods.
//!
//! A rule names one fully-qualified function or method:
//!
//! ```text
//! k8s.io/klog/v2.InfoS                          # package function
//! (github.com/go-logr/logr.Logger).Info         # value receiver
//! (*go.uber.org/zap.SugaredLogger).Infow        # pointer receiver
//! ```
//!
//! Rules are grouped by declaring import path into [`Ruleset`]s; a
//! [`RulesetList`] is the ordered registry consulted during analysis.

mod ruleset;

pub use ruleset::{Ruleset, RulesetList, CUSTOM_RULESET_NAME};

use crate::model::Signature;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Returned when a rule does not follow the rule grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid rule format")]
pub struct InvalidRule;

/// Errors produced while loading a batch of rules.
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    /// A line does not follow the rule grammar.
    #[error("error parse rule at line {line}: {source}")]
    Parse {
        /// Physical line number (1-indexed).
        line: usize,
        /// The parse failure.
        source: InvalidRule,
    },

    /// The rule file could not be read.
    #[error("failed to read rule file {path}: {source}")]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
}

/// A parsed pattern for one function or method, without its import path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FuncRule {
    name: String,
    receiver_type: Option<String>,
}

impl FuncRule {
    /// Creates a rule for a package-level function.
    #[must_use]
    pub fn function(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            receiver_type: None,
        }
    }

    /// Creates a rule for a method. `receiver_type` carries the `*` prefix
    /// for pointer receivers, e.g. `*SugaredLogger`.
    #[must_use]
    pub fn method(receiver_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            receiver_type: Some(receiver_type.into()),
        }
    }

    /// Function or method name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unqualified receiver type, present only for methods.
    #[must_use]
    pub fn receiver_type(&self) -> Option<&str> {
        self.receiver_type.as_deref()
    }

    /// Returns true for method rules.
    #[must_use]
    pub fn is_method(&self) -> bool {
        self.receiver_type.is_some()
    }

    /// Returns true for methods declared on a pointer receiver.
    #[must_use]
    pub fn is_pointer_receiver(&self) -> bool {
        self.receiver_type
            .as_deref()
            .is_some_and(|r| r.starts_with('*'))
    }

    /// Checks a resolved signature against this rule's receiver shape.
    #[must_use]
    pub fn matches_signature(&self, signature: &Signature) -> bool {
        match (&self.receiver_type, &signature.recv) {
            (None, None) => true,
            (Some(expected), Some(recv)) => recv.ty.to_string() == *expected,
            _ => false,
        }
    }

    /// Renders the rule back into rule text under `import_path`.
    #[must_use]
    pub fn display<'a>(&'a self, import_path: &'a str) -> RuleDisplay<'a> {
        RuleDisplay {
            import_path,
            rule: self,
        }
    }
}

/// Rule text rendering returned by [`FuncRule::display`].
#[derive(Debug, Clone, Copy)]
pub struct RuleDisplay<'a> {
    import_path: &'a str,
    rule: &'a FuncRule,
}

impl fmt::Display for RuleDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rule.receiver_type.as_deref() {
            None => write!(f, "{}.{}", self.import_path, self.rule.name),
            Some(recv) => {
                let (star, type_name) = match recv.strip_prefix('*') {
                    Some(type_name) => ("*", type_name),
                    None => ("", recv),
                };
                write!(
                    f,
                    "({star}{}.{type_name}).{}",
                    self.import_path, self.rule.name
                )
            }
        }
    }
}

/// Splits `text` at its last `.` or `/`. A `/` at the split point, or no
/// separator at all, is invalid.
fn split_last_dot(text: &str) -> Result<(&str, &str), InvalidRule> {
    let idx = text.rfind(['.', '/']).ok_or(InvalidRule)?;
    if text[idx..].starts_with('/') {
        return Err(InvalidRule);
    }
    Ok((&text[..idx], &text[idx + 1..]))
}

/// Parses one rule into its import path and match pattern.
///
/// # Errors
///
/// Returns [`InvalidRule`] when the text does not follow the rule grammar or
/// any component (import path, receiver type, name) is empty.
pub fn parse_func_rule(rule: &str) -> Result<(String, FuncRule), InvalidRule> {
    let (prefix, name) = split_last_dot(rule)?;
    if name.is_empty() {
        return Err(InvalidRule);
    }

    if !rule.starts_with('(') {
        if prefix.is_empty() {
            return Err(InvalidRule);
        }
        return Ok((prefix.to_string(), FuncRule::function(name)));
    }

    let receiver = prefix
        .strip_prefix('(')
        .and_then(|r| r.strip_suffix(')'))
        .ok_or(InvalidRule)?;
    let (pointer, receiver) = match receiver.strip_prefix('*') {
        Some(rest) => (true, rest),
        None => (false, receiver),
    };

    let (import_path, type_name) = split_last_dot(receiver)?;
    if import_path.is_empty() || type_name.is_empty() {
        return Err(InvalidRule);
    }
    let receiver_type = if pointer {
        format!("*{type_name}")
    } else {
        type_name.to_string()
    };
    Ok((import_path.to_string(), FuncRule::method(receiver_type, name)))
}
