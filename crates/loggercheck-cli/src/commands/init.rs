//! Init command implementation.

use anyhow::{bail, Result};
use loggercheck_core::SAMPLE_CONFIG;
use std::path::Path;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new("loggercheck.toml"), force)?;

    println!("Created loggercheck.toml");
    println!("\nNext steps:");
    println!("  1. Edit loggercheck.toml to enable checks or add custom loggers");
    println!("  2. Run: loggercheck check <package dumps>");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, SAMPLE_CONFIG)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("loggercheck.toml");
        std::fs::write(&path, "disable = [\"klog\"]\n").unwrap();

        assert!(write_config(&path, false).is_err());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "disable = [\"klog\"]\n"
        );

        write_config(&path, true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), SAMPLE_CONFIG);
    }
}
