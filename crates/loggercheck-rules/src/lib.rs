//! # loggercheck-rules
//!
//! Built-in logger dialects for loggercheck.
//!
//! ## Available Dialects
//!
//! | Name | Package | Dialect |
//! |------|---------|---------|
//! | `logr` | `github.com/go-logr/logr` | general |
//! | `klog` | `k8s.io/klog/v2` | general |
//! | `zap` | `go.uber.org/zap` (sugared logger) | structured field (`Field`) |
//! | `kitlog` | `github.com/go-kit/log` | general |
//! | `slog` | `log/slog` | group attribute (`Attr`) |
//!
//! ## Usage
//!
//! ```ignore
//! use loggercheck_rules::analyzer_builder;
//!
//! let analyzer = analyzer_builder()
//!     .disable("klog")
//!     .no_printf_like(true)
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builtin;

pub use builtin::{builtin_names, builtin_rulesets, KITLOG, KLOG, LOGR, SLOG, ZAP};

use loggercheck_core::AnalyzerBuilder;

/// Returns an analyzer builder seeded with the built-in dialects.
#[must_use]
pub fn analyzer_builder() -> AnalyzerBuilder {
    AnalyzerBuilder::new().builtin(builtin_rulesets().clone())
}

/// Re-export core types for convenience.
pub use loggercheck_core::{Analyzer, Dialect, Ruleset, RulesetList};
