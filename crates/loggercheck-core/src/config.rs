//! Configuration types for loggercheck.

use crate::verify::Checks;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Sample configuration written by `loggercheck init`.
pub const SAMPLE_CONFIG: &str = r#"# loggercheck configuration

# Dialects to skip. Known names: custom, kitlog, klog, logr, slog, zap.
disable = []

# Require keys to be constant ASCII strings.
require-string-key = false

# Reject printf-style directives such as %s in logging messages.
no-printf-like = false

# Extra logger functions, one rule per entry. Ignored when rule-file is set.
# rules = [
#     "(*example.com/log.Logger).Infow",
#     "example.com/log.Infow",
# ]

# File with one rule per line; relative to this file.
# rule-file = "loggercheck-rules.txt"
"#;

/// Top-level configuration for loggercheck.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Dialect names to skip.
    #[serde(default)]
    pub disable: Vec<String>,

    /// Require keys to be constant ASCII strings.
    #[serde(default)]
    pub require_string_key: bool,

    /// Reject printf-style directives in logging messages.
    #[serde(default)]
    pub no_printf_like: bool,

    /// Custom rule file. Takes precedence over `rules`.
    #[serde(default)]
    pub rule_file: Option<PathBuf>,

    /// Custom rules.
    #[serde(default)]
    pub rules: Vec<String>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// A relative `rule-file` is resolved against the config file's directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut config = Self::parse(&content)?;
        if let (Some(rule_file), Some(dir)) = (&config.rule_file, path.parent()) {
            if rule_file.is_relative() {
                config.rule_file = Some(dir.join(rule_file));
            }
        }
        Ok(config)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Checks if a dialect is disabled.
    #[must_use]
    pub fn is_disabled(&self, name: &str) -> bool {
        self.disable.iter().any(|d| d == name)
    }

    /// Optional verification stages enabled by this configuration.
    #[must_use]
    pub fn checks(&self) -> Checks {
        Checks {
            require_string_key: self.require_string_key,
            no_printf_like: self.no_printf_like,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}
