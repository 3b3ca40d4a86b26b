//! Generate command

use std::path::Path;
use std::sync::Arc;

use clap::Args;
use tracing::{info, warn};

use whatsnew_core::config::{load_config_or_default, validate_config, Config};
use whatsnew_core::ConfigError;
use whatsnew_git::GitRepo;
use whatsnew_pipeline::{
    GitHubConfig, GitHubProvider, LocalGitProvider, Pipeline, PipelineContext, SourceProvider,
};

use crate::cli::output;
use crate::cli::{Cli, OutputFormat};

/// Where release information is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ProviderKind {
    /// The git repository in the working directory
    Local,
    /// The GitHub REST API
    Github,
}

impl ProviderKind {
    fn from_config(kind: &str) -> Result<Self, ConfigError> {
        match kind {
            "local" => Ok(Self::Local),
            "github" => Ok(Self::Github),
            other => Err(ConfigError::InvalidValue {
                field: "provider.kind".to_string(),
                message: format!("unknown provider '{}'", other),
            }),
        }
    }
}

/// Collect and categorize the notes for a release
#[derive(Debug, Args)]
pub struct GenerateCommand {
    /// Repository as OWNER/REPO (defaults to the directory name for local repositories)
    #[arg(value_name = "OWNER/REPO")]
    pub repository: Option<String>,

    /// Release tag (default: latest release)
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Provider to read from (overrides the configuration)
    #[arg(long, value_enum)]
    pub provider: Option<ProviderKind>,

    /// Skip commit history
    #[arg(long)]
    pub no_commits: bool,
}

impl GenerateCommand {
    /// Execute the generate command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(self.execute_async(cli))
    }

    async fn execute_async(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(
            repository = ?self.repository,
            tag = ?self.tag,
            provider = ?self.provider,
            no_commits = self.no_commits,
            "executing generate command"
        );
        let cwd = std::env::current_dir()?;
        let (mut config, config_path) = load_config_or_default(&cwd)?;
        validate_config(&config)?;
        if let Some(path) = &config_path {
            info!(path = %path.display(), "loaded configuration");
        }
        if self.no_commits {
            config.sources.commits.enabled = false;
        }
        if config.ai.enabled {
            warn!("AI extraction is enabled but no model backend is available; continuing without it");
        }

        let kind = match self.provider {
            Some(kind) => kind,
            None => ProviderKind::from_config(&config.provider.kind)?,
        };
        let (owner, repo, provider) = self.provider_for(kind, &config, &cwd)?;

        let pipeline = Pipeline::from_config(&config, provider);
        let ctx = pipeline.run(&owner, &repo, self.tag.as_deref()).await?;

        match cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&ctx)?),
            OutputFormat::Text => print_text(&ctx, cli),
        }

        Ok(())
    }

    fn provider_for(
        &self,
        kind: ProviderKind,
        config: &Config,
        cwd: &Path,
    ) -> anyhow::Result<(String, String, Arc<dyn SourceProvider>)> {
        match kind {
            ProviderKind::Local => {
                let root = GitRepo::discover(cwd)?.path().to_path_buf();
                let (owner, repo) = match &self.repository {
                    Some(repository) => parse_repository(repository)?,
                    None => (
                        "local".to_string(),
                        root.file_name()
                            .map(|n| n.to_string_lossy().to_string())
                            .unwrap_or_else(|| "repository".to_string()),
                    ),
                };
                let provider = LocalGitProvider::new(root)
                    .with_max_commits(config.sources.commits.max_commits);
                Ok((owner, repo, Arc::new(provider)))
            }
            ProviderKind::Github => {
                let Some(repository) = &self.repository else {
                    anyhow::bail!("The github provider needs a repository as OWNER/REPO");
                };
                let (owner, repo) = parse_repository(repository)?;
                let provider = GitHubProvider::new(
                    GitHubConfig {
                        api_url: config.provider.api_url.clone(),
                        token: None,
                        timeout_secs: config.provider.timeout_secs,
                        max_commits: config.sources.commits.max_commits,
                    }
                    .with_token_from_env(&config.provider.token_env),
                )?;
                Ok((owner, repo, Arc::new(provider)))
            }
        }
    }
}

/// Split `OWNER/REPO`
fn parse_repository(value: &str) -> anyhow::Result<(String, String)> {
    match value.trim().split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => anyhow::bail!("Expected OWNER/REPO, got '{}'", value),
    }
}

fn print_text(ctx: &PipelineContext, cli: &Cli) {
    let Some(result) = ctx.final_result() else {
        return;
    };

    if !cli.quiet {
        let release = result
            .metadata
            .tag
            .as_deref()
            .or(result.metadata.version.as_deref())
            .unwrap_or("unreleased");
        println!(
            "{} {}",
            output::header(&format!("{}/{}", ctx.owner(), ctx.repo())),
            output::tag_style().apply_to(release)
        );
        println!("{}", output::key_value("Sources", &ctx.sources_used().join(" + ")));
        println!(
            "{}",
            output::key_value("Confidence", &format!("{:.2}", result.confidence))
        );

        if cli.verbose {
            if let Some(date) = &result.metadata.date {
                println!("{}", output::key_value("Date", date));
            }
            if let Some(count) = result.metadata.commit_count {
                println!("{}", output::key_value("Commits", &count.to_string()));
            }
            if let Some(url) = &result.metadata.compare_url {
                println!("{}", output::key_value("Compare", url));
            }
            if let Some(assessment) = ctx.assessment() {
                println!(
                    "{}",
                    output::key_value(
                        "Quality",
                        &format!("{:.2} {:?}", assessment.score, assessment.reasons)
                    )
                );
            }
        }
        println!();
    }

    if result.total_items() == 0 {
        output::warning("No changes found");
        return;
    }
    output::print_categories(&result.categories);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repository() {
        assert_eq!(
            parse_repository("acme/widgets").unwrap(),
            ("acme".to_string(), "widgets".to_string())
        );
        assert!(parse_repository("widgets").is_err());
        assert!(parse_repository("/widgets").is_err());
        assert!(parse_repository("a/b/c").is_err());
    }

    #[test]
    fn test_provider_kind_from_config() {
        assert_eq!(ProviderKind::from_config("github").unwrap(), ProviderKind::Github);
        assert!(ProviderKind::from_config("gitlab").is_err());
    }
}
