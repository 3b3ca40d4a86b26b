//! Detect command

use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use tracing::info;

use whatsnew_core::ExtractError;
use whatsnew_extract::{categorize_items, detect_format, ExtractorRegistry, ReleaseFormat};

use crate::cli::output;
use crate::cli::{Cli, OutputFormat};

/// Detect the dialect of release text and categorize it
#[derive(Debug, Args)]
pub struct DetectCommand {
    /// File to read (default: stdin)
    pub file: Option<PathBuf>,

    /// Extract as this dialect instead of the detected one
    #[arg(long, value_name = "DIALECT")]
    pub dialect: Option<ReleaseFormat>,

    /// Version block to extract from a multi-release changelog
    #[arg(long = "for-version", value_name = "VERSION")]
    pub for_version: Option<String>,
}

impl DetectCommand {
    /// Execute the detect command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(file = ?self.file, dialect = ?self.dialect, "executing detect command");
        let text = self.read_input()?;

        let detection = detect_format(&text);
        let extraction =
            ExtractorRegistry::new().extract_auto(&text, self.for_version.as_deref(), self.dialect);
        let categories = categorize_items(extraction.items);

        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "detected": detection,
                    "metadata": extraction.metadata,
                    "categories": categories,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    println!(
                        "{}",
                        output::key_value(
                            "Detected",
                            &format!("{} ({:.2})", detection.format, detection.confidence)
                        )
                    );
                    if self.dialect.is_some() {
                        println!(
                            "{}",
                            output::key_value("Extracted as", extraction.metadata.format.as_str())
                        );
                    }
                    if let Some(version) = &extraction.metadata.version {
                        println!("{}", output::key_value("Version", version));
                    }
                    println!();
                }
                if categories.is_empty() {
                    output::warning("No changes found");
                } else {
                    output::print_categories(&categories);
                }
            }
        }

        Ok(())
    }

    fn read_input(&self) -> anyhow::Result<String> {
        match &self.file {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .map_err(|_| ExtractError::Unreadable(path.clone()))?;
                Ok(text)
            }
            None => {
                let mut text = String::new();
                std::io::stdin().read_to_string(&mut text)?;
                Ok(text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_reads_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.md");
        std::fs::write(&path, "- feat: add export\n").unwrap();

        let cli = Cli::parse_from([
            "whatsnew",
            "detect",
            path.to_str().unwrap(),
            "--dialect",
            "conventional",
        ]);
        let crate::cli::Commands::Detect(cmd) = &cli.command else {
            panic!("expected detect");
        };

        assert_eq!(cmd.dialect, Some(ReleaseFormat::ConventionalCommits));
        assert_eq!(cmd.read_input().unwrap(), "- feat: add export\n");
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let cmd = DetectCommand {
            file: Some(PathBuf::from("/nonexistent/notes.md")),
            dialect: None,
            for_version: None,
        };
        let err = cmd.read_input().unwrap_err();
        assert!(err.downcast_ref::<ExtractError>().is_some());
    }
}
