//! # loggercheck-core
//!
//! Core engine for checking key-value arguments of structured logging calls.
//!
//! The host hands over a type-checked [`PackageUnit`]; the [`Analyzer`]
//! finds calls to known logger functions and reports:
//!
//! - an odd number of key-value arguments
//! - keys that are not constant ASCII strings (opt-in)
//! - printf-style directives in logging messages (opt-in)
//!
//! Logger functions are described in a small rule language (see [`rules`])
//! and grouped into named [`Ruleset`]s, each with a [`Dialect`] describing
//! how that library lays out its arguments.
//!
//! ## Example
//!
//! ```ignore
//! use loggercheck_core::Analyzer;
//!
//! let analyzer = Analyzer::builder()
//!     .rule("(*example.com/log.Logger).Infow")
//!     .require_string_key(true)
//!     .build()?;
//!
//! let result = analyzer.analyze(&unit);
//! for finding in &result.findings {
//!     println!("{finding}");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod dialect;
mod types;

/// Typed syntax model supplied by the host.
pub mod model;
/// Printf directive scanner.
pub mod printf;
pub mod rules;
/// Text helpers.
pub mod utils;
pub mod verify;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{Config, ConfigError, SAMPLE_CONFIG};
pub use context::{CallContext, Unverifiable};
pub use dialect::Dialect;
pub use model::{CallExpr, Expr, FuncSymbol, PackageUnit, SourceFile, Span};
pub use rules::{
    parse_func_rule, FuncRule, InvalidRule, Ruleset, RulesetList, RulesError, CUSTOM_RULESET_NAME,
};
pub use types::{Diagnostic, Finding, FindingDiagnostic, LintResult, Reporter, CATEGORY};
pub use verify::Checks;
