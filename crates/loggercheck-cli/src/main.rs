//! loggercheck CLI tool.
//!
//! Usage:
//! ```bash
//! loggercheck check [OPTIONS] [PATH]...
//! loggercheck list-dialects
//! loggercheck init
//! ```
//!
//! `check` reads JSON package dumps produced by a front-end that has already
//! type-checked the source; each dump is one serialized `PackageUnit`.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Checks key-value pairs of structured logging calls
#[derive(Parser)]
#[command(name = "loggercheck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check logger calls in package dumps
    Check(commands::check::CheckArgs),

    /// List built-in dialects and their rules
    ListDialects,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-finding compact format.
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check(args) => {
            let project_dir = std::env::current_dir()?;
            let (_, config) = config_resolver::load(&project_dir, cli.config.as_deref())?;
            commands::check::run(&args, config)
        }
        Commands::ListDialects => {
            commands::list_dialects::run();
            Ok(())
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
