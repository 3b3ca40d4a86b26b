//! Init command

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::info;

use whatsnew_core::config::{Config, DEFAULT_CONFIG_TEMPLATE, DEFAULT_CONFIG_YAML};

use crate::cli::output;
use crate::cli::Cli;

/// Write a default configuration file
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,

    /// Output file path (a `.toml` extension writes TOML)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl InitCommand {
    /// Execute the init command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(force = self.force, output = ?self.output, "executing init command");
        let cwd = std::env::current_dir()?;
        let config_path = self
            .output
            .clone()
            .unwrap_or_else(|| cwd.join(DEFAULT_CONFIG_YAML));

        write_config(&config_path, self.force)?;

        if !cli.quiet {
            output::success(&format!(
                "Created configuration at {}",
                output::path_style().apply_to(config_path.display())
            ));
            println!();
            println!("Next steps:");
            println!("  1. Edit {} to tune sources and thresholds", config_path.display());
            println!(
                "  2. Run {} to collect the notes for the latest release",
                output::path_style().apply_to("whatsnew generate")
            );
        }

        Ok(())
    }
}

/// Write the default configuration to `path`, as TOML when the extension says so
fn write_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    let content = if path.extension().is_some_and(|e| e == "toml") {
        toml::to_string_pretty(&Config::default())?
    } else {
        DEFAULT_CONFIG_TEMPLATE.to_string()
    };

    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_writes_yaml_template() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("whatsnew.yaml");

        write_config(&path, false).unwrap();

        let config: Config = serde_yaml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(config.provider.kind, "local");
    }

    #[test]
    fn test_writes_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("whatsnew.toml");

        write_config(&path, false).unwrap();

        let config: Config = toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(config.sources.commits.max_commits, 250);
    }

    #[test]
    fn test_refuses_to_overwrite_without_force() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("whatsnew.yaml");
        std::fs::write(&path, "custom").unwrap();

        assert!(write_config(&path, false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "custom");

        write_config(&path, true).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("sources:"));
    }
}
