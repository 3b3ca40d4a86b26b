//! Source provider contract
//!
//! A provider is the only thing that talks to the outside world. Every
//! method may fail or return `None`; the pipeline treats both as the
//! source being unavailable.

use serde::{Deserialize, Serialize};
use whatsnew_extract::ReleaseFormat;

use crate::error::Result;

/// A published release
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    /// Tag the release points at
    pub tag: String,
    /// Release notes body
    pub body: String,
    /// Display name
    pub name: Option<String>,
    /// Publication date (`YYYY-MM-DD`)
    pub published_at: Option<String>,
    /// Web URL of the release page
    pub html_url: Option<String>,
    /// Dialect the provider knows the body to be in
    pub format_hint: Option<ReleaseFormat>,
}

impl Release {
    /// Create a release with a tag and body
    pub fn new(tag: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            body: body.into(),
            name: None,
            published_at: None,
            html_url: None,
            format_hint: None,
        }
    }

    /// Set the publication date
    pub fn with_published_at(mut self, date: impl Into<String>) -> Self {
        self.published_at = Some(date.into());
        self
    }

    /// Set the format hint
    pub fn with_format_hint(mut self, format: ReleaseFormat) -> Self {
        self.format_hint = Some(format);
        self
    }
}

/// Where to look for a changelog file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangelogQuery {
    /// Revision to read from; the default branch or working tree when `None`
    pub git_ref: Option<String>,
    /// Candidate paths, tried in order
    pub paths: Vec<String>,
}

/// A changelog file found by a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogFile {
    pub path: String,
    pub content: String,
}

/// Tag listing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagQuery {
    /// Maximum number of tags to return
    pub limit: usize,
}

impl Default for TagQuery {
    fn default() -> Self {
        Self { limit: 30 }
    }
}

/// A tag, newest first in listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub commit_sha: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, commit_sha: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commit_sha: commit_sha.into(),
        }
    }
}

/// One commit in a comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSummary {
    pub sha: String,
    /// Full commit message
    pub message: String,
}

impl CommitSummary {
    pub fn new(sha: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            sha: sha.into(),
            message: message.into(),
        }
    }
}

/// Commits between two revisions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    pub commits: Vec<CommitSummary>,
    /// Web URL of the comparison, when the provider has one
    pub url: Option<String>,
}

/// Access to a repository's releases, changelogs, tags and history
#[async_trait::async_trait]
pub trait SourceProvider: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &str;

    /// Most recent published release
    async fn get_latest_release(&self, owner: &str, repo: &str) -> Result<Option<Release>>;

    /// Release for a specific tag
    async fn get_release_by_tag(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
    ) -> Result<Option<Release>>;

    /// First changelog file found among the query's paths
    async fn find_changelog(
        &self,
        owner: &str,
        repo: &str,
        query: &ChangelogQuery,
    ) -> Result<Option<ChangelogFile>>;

    /// Tags, newest first
    async fn get_tags(&self, owner: &str, repo: &str, query: &TagQuery) -> Result<Vec<Tag>>;

    /// Commits reachable from `head` but not from `base`.
    ///
    /// Without a base the provider returns recent history up to `head`.
    async fn compare(
        &self,
        owner: &str,
        repo: &str,
        base: Option<&str>,
        head: &str,
    ) -> Result<Comparison>;
}
