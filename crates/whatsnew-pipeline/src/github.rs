//! GitHub REST provider

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::{PipelineError, Result};
use crate::provider::{
    ChangelogFile, ChangelogQuery, CommitSummary, Comparison, Release, SourceProvider, Tag,
    TagQuery,
};

const DEFAULT_API_URL: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("whatsnew/", env!("CARGO_PKG_VERSION"));
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw+json";

/// GitHub provider configuration
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    /// API base URL (default: "https://api.github.com")
    pub api_url: String,
    /// Bearer token, sent when present
    pub token: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Commits returned by a comparison without a base
    pub max_commits: usize,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            timeout_secs: 30,
            max_commits: 100,
        }
    }
}

impl GitHubConfig {
    /// Read the token from an environment variable, ignoring empty values
    pub fn with_token_from_env(mut self, var: &str) -> Self {
        if let Ok(token) = std::env::var(var) {
            if !token.trim().is_empty() {
                debug!(var, "loaded GitHub token from environment");
                self.token = Some(token);
            }
        }
        self
    }
}

#[derive(Debug, Deserialize)]
struct GhRelease {
    tag_name: String,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    html_url: Option<String>,
}

impl From<GhRelease> for Release {
    fn from(gh: GhRelease) -> Self {
        Release {
            tag: gh.tag_name,
            body: gh.body.unwrap_or_default(),
            name: gh.name.filter(|n| !n.trim().is_empty()),
            published_at: gh.published_at.map(|d| d.format("%Y-%m-%d").to_string()),
            html_url: gh.html_url,
            format_hint: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GhTag {
    name: String,
    commit: GhTagCommit,
}

#[derive(Debug, Deserialize)]
struct GhTagCommit {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct GhCommit {
    sha: String,
    commit: GhCommitDetail,
}

#[derive(Debug, Deserialize)]
struct GhCommitDetail {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GhComparison {
    #[serde(default)]
    html_url: Option<String>,
    #[serde(default)]
    commits: Vec<GhCommit>,
}

/// Provider backed by the GitHub REST API
pub struct GitHubProvider {
    config: GitHubConfig,
    client: Client,
}

impl GitHubProvider {
    /// Create a new provider
    pub fn new(config: GitHubConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    fn repo_url(&self, owner: &str, repo: &str, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.config.api_url.trim_end_matches('/'),
            owner,
            repo,
            path.trim_start_matches('/')
        )
    }

    fn get(&self, url: &str, accept: &str) -> RequestBuilder {
        let request = self
            .client
            .get(url)
            .header("Accept", accept)
            .header("X-GitHub-Api-Version", "2022-11-28");
        match &self.config.token {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    /// Send a request; 404 maps to `None`
    async fn send(&self, request: RequestBuilder) -> Result<Option<reqwest::Response>> {
        let response = request.send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PipelineError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }
        Ok(Some(response))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        debug!(url, "GET");
        match self.send(self.get(url, JSON_MEDIA_TYPE)).await? {
            Some(response) => Ok(Some(response.json().await?)),
            None => Ok(None),
        }
    }
}

#[async_trait::async_trait]
impl SourceProvider for GitHubProvider {
    fn name(&self) -> &str {
        "github"
    }

    #[instrument(skip(self))]
    async fn get_latest_release(&self, owner: &str, repo: &str) -> Result<Option<Release>> {
        let url = self.repo_url(owner, repo, "releases/latest");
        let release: Option<GhRelease> = self.get_json(&url).await?;
        Ok(release.map(Release::from))
    }

    #[instrument(skip(self))]
    async fn get_release_by_tag(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
    ) -> Result<Option<Release>> {
        let url = self.repo_url(owner, repo, &format!("releases/tags/{}", tag));
        let release: Option<GhRelease> = self.get_json(&url).await?;
        Ok(release.map(Release::from))
    }

    #[instrument(skip(self, query))]
    async fn find_changelog(
        &self,
        owner: &str,
        repo: &str,
        query: &ChangelogQuery,
    ) -> Result<Option<ChangelogFile>> {
        for path in &query.paths {
            let url = self.repo_url(owner, repo, &format!("contents/{}", path));
            let mut request = self.get(&url, RAW_MEDIA_TYPE);
            if let Some(git_ref) = &query.git_ref {
                request = request.query(&[("ref", git_ref)]);
            }

            if let Some(response) = self.send(request).await? {
                let content = response.text().await?;
                debug!(path = %path, "found changelog");
                return Ok(Some(ChangelogFile {
                    path: path.clone(),
                    content,
                }));
            }
        }
        Ok(None)
    }

    #[instrument(skip(self))]
    async fn get_tags(&self, owner: &str, repo: &str, query: &TagQuery) -> Result<Vec<Tag>> {
        let url = self.repo_url(
            owner,
            repo,
            &format!("tags?per_page={}", query.limit.clamp(1, 100)),
        );
        let tags: Option<Vec<GhTag>> = self.get_json(&url).await?;
        Ok(tags
            .unwrap_or_default()
            .into_iter()
            .map(|t| Tag::new(t.name, t.commit.sha))
            .collect())
    }

    #[instrument(skip(self))]
    async fn compare(
        &self,
        owner: &str,
        repo: &str,
        base: Option<&str>,
        head: &str,
    ) -> Result<Comparison> {
        match base {
            Some(base) => {
                let url = self.repo_url(owner, repo, &format!("compare/{}...{}", base, head));
                let comparison: Option<GhComparison> = self.get_json(&url).await?;
                let comparison = comparison.ok_or_else(|| {
                    PipelineError::provider(format!("cannot compare {}...{}", base, head))
                })?;
                // the API lists oldest first
                let commits = comparison
                    .commits
                    .into_iter()
                    .rev()
                    .map(|c| CommitSummary::new(c.sha, c.commit.message))
                    .collect();
                Ok(Comparison {
                    commits,
                    url: comparison.html_url,
                })
            }
            None => {
                let per_page = self.config.max_commits.clamp(1, 100);
                let path = if head == "HEAD" {
                    format!("commits?per_page={}", per_page)
                } else {
                    format!("commits?sha={}&per_page={}", head, per_page)
                };
                let commits: Option<Vec<GhCommit>> =
                    self.get_json(&self.repo_url(owner, repo, &path)).await?;
                Ok(Comparison {
                    commits: commits
                        .unwrap_or_default()
                        .into_iter()
                        .map(|c| CommitSummary::new(c.sha, c.commit.message))
                        .collect(),
                    url: None,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = GitHubConfig::default();
        assert_eq!(config.api_url, "https://api.github.com");
        assert!(config.token.is_none());
    }

    #[test]
    fn test_repo_url() {
        let provider = GitHubProvider::new(GitHubConfig {
            api_url: "https://ghe.example.com/api/v3/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            provider.repo_url("o", "r", "/releases/latest"),
            "https://ghe.example.com/api/v3/repos/o/r/releases/latest"
        );
    }

    #[test]
    fn test_release_conversion() {
        let json = r###"{
            "tag_name": "v1.2.0",
            "body": "## What's Changed\n* Fix",
            "name": "",
            "published_at": "2024-01-15T10:00:00Z",
            "html_url": "https://github.com/o/r/releases/tag/v1.2.0"
        }"###;
        let gh: GhRelease = serde_json::from_str(json).unwrap();
        let release = Release::from(gh);
        assert_eq!(release.tag, "v1.2.0");
        assert!(release.name.is_none());
        assert_eq!(release.published_at.as_deref(), Some("2024-01-15"));
    }

    #[test]
    fn test_release_without_body() {
        let gh: GhRelease = serde_json::from_str(r#"{"tag_name": "v1", "body": null}"#).unwrap();
        assert_eq!(Release::from(gh).body, "");
    }

    #[test]
    fn test_comparison_payload() {
        let json = r#"{
            "html_url": "https://github.com/o/r/compare/v1...v2",
            "commits": [
                {"sha": "a1", "commit": {"message": "feat: one"}},
                {"sha": "b2", "commit": {"message": "fix: two"}}
            ]
        }"#;
        let comparison: GhComparison = serde_json::from_str(json).unwrap();
        assert_eq!(comparison.commits.len(), 2);
        assert_eq!(comparison.commits[1].commit.message, "fix: two");
    }
}
