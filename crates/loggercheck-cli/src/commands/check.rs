//! Check command implementation.

use anyhow::{bail, Context, Result};
use loggercheck_core::{Config, LintResult, PackageUnit};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::OutputFormat;

/// Arguments of the `check` subcommand.
#[derive(Debug, clap::Args)]
pub struct CheckArgs {
    /// Package dumps (JSON) or directories containing them
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Dialects to disable (comma-separated, replaces the configured list)
    #[arg(long, value_delimiter = ',')]
    pub disable: Option<Vec<String>>,

    /// File with custom rules, one per line
    #[arg(long = "rulefile")]
    pub rule_file: Option<PathBuf>,

    /// Custom rules (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub rules: Vec<String>,

    /// Require keys to be constant ASCII strings
    #[arg(long)]
    pub require_string_key: bool,

    /// Reject printf-style directives in logging messages
    #[arg(long)]
    pub no_printf_like: bool,
}

impl CheckArgs {
    /// Applies command-line overrides on top of the file configuration.
    fn apply(&self, mut config: Config) -> Config {
        if let Some(disable) = &self.disable {
            config.disable.clone_from(disable);
        }
        if let Some(rule_file) = &self.rule_file {
            config.rule_file = Some(rule_file.clone());
        }
        config.rules.extend(self.rules.iter().cloned());
        config.require_string_key |= self.require_string_key;
        config.no_printf_like |= self.no_printf_like;
        config
    }
}

/// Runs the check command.
pub fn run(args: &CheckArgs, config: Config) -> Result<()> {
    let config = args.apply(config);

    let analyzer = loggercheck_rules::analyzer_builder()
        .config(&config)
        .build()
        .context("Failed to build analyzer")?;

    let units = load_units(&discover_dumps(&args.paths)?)?;
    tracing::info!(
        "Analyzing {} package dump(s) with {} ruleset(s)",
        units.len(),
        analyzer.rulesets().len()
    );

    let mut result = LintResult::new();
    let mut sources = HashMap::new();
    for unit in &units {
        for file in &unit.files {
            if let Some(content) = &file.content {
                sources.insert(file.path.clone(), content.clone());
            }
        }
        result.extend(analyzer.analyze(unit));
    }

    super::output::print(&result, &sources, args.format)?;

    if result.has_findings() {
        std::process::exit(1);
    }

    Ok(())
}

/// A package dump candidate.
#[derive(Debug, PartialEq, Eq)]
struct Dump {
    path: PathBuf,
    /// Named on the command line rather than found by walking a directory.
    explicit: bool,
}

/// Expands directories into the JSON files below them, sorted by path.
fn discover_dumps(paths: &[PathBuf]) -> Result<Vec<Dump>> {
    let mut dumps = Vec::new();
    for path in paths {
        if path.is_file() {
            dumps.push(Dump {
                path: path.clone(),
                explicit: true,
            });
            continue;
        }
        if !path.is_dir() {
            bail!("No such file or directory: {}", path.display());
        }
        let mut found: Vec<PathBuf> = WalkDir::new(path)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {e}");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(walkdir::DirEntry::into_path)
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        found.sort();
        tracing::debug!("Found {} dump(s) under {}", found.len(), path.display());
        dumps.extend(found.into_iter().map(|path| Dump {
            path,
            explicit: false,
        }));
    }
    Ok(dumps)
}

/// Loads every dump. JSON files found by walking that are not package dumps
/// are skipped; explicitly named files must parse.
fn load_units(dumps: &[Dump]) -> Result<Vec<PackageUnit>> {
    let mut units = Vec::with_capacity(dumps.len());
    for dump in dumps {
        match load_unit(&dump.path) {
            Ok(unit) => units.push(unit),
            Err(e) if !dump.explicit => tracing::warn!("Skipping {}: {e:#}", dump.path.display()),
            Err(e) => return Err(e),
        }
    }
    Ok(units)
}

/// Reads one package dump.
fn load_unit(path: &Path) -> Result<PackageUnit> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read package dump: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse package dump: {}", path.display()))
}
