//! # loggercheck
//!
//! Checks the key-value arguments of structured logging calls.
//!
//! This is the main facade crate that re-exports the core engine and the
//! built-in logger dialects.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use loggercheck::{new_analyzer, Config};
//!
//! let config = Config::parse(r#"
//!     disable = ["klog"]
//!     require-string-key = true
//! "#)?;
//! let analyzer = new_analyzer(&config)?;
//!
//! // `unit` is a type-checked package supplied by the host.
//! let result = analyzer.analyze(&unit);
//! for finding in &result.findings {
//!     println!("{finding}");
//! }
//! ```
//!
//! ## Custom Loggers
//!
//! Extra logger functions are described one per line:
//!
//! ```text
//! # package function
//! example.com/log.Infow
//! # method on a pointer receiver
//! (*example.com/log.Logger).Infow
//! ```
//!
//! They are grouped under the `custom` dialect, which can be disabled like
//! any built-in one.

#![forbid(unsafe_code)]

// Re-export core types and traits
pub use loggercheck_core::*;

/// Built-in dialects.
pub mod rules {
    pub use loggercheck_rules::*;
}

/// Builds an analyzer from the built-in dialects and `config`.
///
/// # Errors
///
/// Returns an error if the configured rule file cannot be read, a custom
/// rule is malformed, or a disabled name is not a known dialect.
pub fn new_analyzer(config: &Config) -> Result<Analyzer, AnalyzerError> {
    loggercheck_rules::analyzer_builder().config(config).build()
}
