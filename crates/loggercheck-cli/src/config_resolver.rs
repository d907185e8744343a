//! Locating and loading the configuration for a run.
//!
//! Candidates, first existing one wins:
//!
//! 1. `--config` (must exist)
//! 2. `{project}/loggercheck.toml`, then `{project}/.loggercheck.toml`
//! 3. `$LOGGERCHECK_CONFIG_DIR/config.toml`, else `~/.loggercheck/config.toml`
//!
//! Without any candidate the built-in defaults apply.

use anyhow::{Context, Result};
use loggercheck_core::Config;
use std::path::{Path, PathBuf};

/// Project-level config file names, checked in order.
pub const PROJECT_CONFIG_NAMES: &[&str] = &["loggercheck.toml", ".loggercheck.toml"];

/// Where the configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// Found in the project directory.
    Project(PathBuf),
    /// Found in the global config directory.
    Global(PathBuf),
    /// Nothing found.
    Default,
}

/// Finds and parses the configuration for `project_dir`.
///
/// A relative `rule-file` in the returned config is already resolved
/// against the directory of the file it was read from.
///
/// # Errors
///
/// Fails when the chosen file cannot be read or parsed.
pub fn load(project_dir: &Path, explicit: Option<&Path>) -> Result<(ConfigSource, Config)> {
    load_from(locate(project_dir, explicit, global_config_dir()))
}

fn load_from(source: ConfigSource) -> Result<(ConfigSource, Config)> {
    let config = match &source {
        ConfigSource::Default => {
            tracing::debug!("No config file found, using defaults");
            Config::default()
        }
        ConfigSource::Global(path) => {
            tracing::info!("Using global config: {}", path.display());
            read(path)?
        }
        ConfigSource::Explicit(path) | ConfigSource::Project(path) => {
            tracing::debug!("Using config: {}", path.display());
            read(path)?
        }
    };
    Ok((source, config))
}

fn read(path: &Path) -> Result<Config> {
    Config::from_file(path).with_context(|| format!("Failed to load config: {}", path.display()))
}

/// Picks the config file without reading it. `global_dir` is a parameter so
/// tests do not depend on the environment.
fn locate(project_dir: &Path, explicit: Option<&Path>, global_dir: Option<PathBuf>) -> ConfigSource {
    if let Some(path) = explicit {
        return ConfigSource::Explicit(path.to_path_buf());
    }
    PROJECT_CONFIG_NAMES
        .iter()
        .map(|name| project_dir.join(name))
        .find(|p| p.is_file())
        .map(ConfigSource::Project)
        .or_else(|| {
            global_dir
                .map(|dir| dir.join("config.toml"))
                .filter(|p| p.is_file())
                .map(ConfigSource::Global)
        })
        .unwrap_or(ConfigSource::Default)
}

/// The global config directory: `$LOGGERCHECK_CONFIG_DIR`, else
/// `~/.loggercheck`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    std::env::var_os("LOGGERCHECK_CONFIG_DIR")
        .map(PathBuf::from)
        .or_else(|| home::home_dir().map(|h| h.join(".loggercheck")))
}
