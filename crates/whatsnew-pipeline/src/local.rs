//! Local git provider
//!
//! Serves release information from a repository on disk. Annotated tag
//! messages stand in for release notes, changelog files are read from the
//! working tree or a tagged tree, and comparisons walk local history.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};
use whatsnew_git::{GitRepo, TagInfo};

use crate::error::{PipelineError, Result};
use crate::provider::{
    ChangelogFile, ChangelogQuery, CommitSummary, Comparison, Release, SourceProvider, Tag,
    TagQuery,
};

/// Commits returned by a comparison without a base
const DEFAULT_MAX_COMMITS: usize = 250;

/// Provider backed by a local git repository
pub struct LocalGitProvider {
    path: PathBuf,
    max_commits: usize,
}

impl LocalGitProvider {
    /// Create a provider for the repository at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_commits: DEFAULT_MAX_COMMITS,
        }
    }

    /// Limit how many commits a comparison returns
    pub fn with_max_commits(mut self, max_commits: usize) -> Self {
        self.max_commits = max_commits;
        self
    }

    /// Repository path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run a git operation on a blocking thread
    async fn with_repo<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&GitRepo) -> whatsnew_git::Result<T> + Send + 'static,
    {
        let path = self.path.clone();
        let joined = tokio::task::spawn_blocking(move || {
            let repo = GitRepo::open(&path)?;
            op(&repo)
        })
        .await
        .map_err(|e| PipelineError::provider(format!("git task failed: {}", e)))?;

        Ok(joined?)
    }
}

/// Annotated tags become releases; lightweight tags carry no notes
fn tag_to_release(tag: TagInfo) -> Option<Release> {
    let body = tag.message.as_deref().map(str::trim).unwrap_or_default();
    if body.is_empty() {
        debug!(tag = %tag.name, "tag has no annotation");
        return None;
    }

    let mut release = Release::new(&tag.name, body);
    release.name = Some(tag.name.clone());
    if let Some(ts) = tag.timestamp {
        release = release.with_published_at(ts.format("%Y-%m-%d").to_string());
    }
    Some(release)
}

#[async_trait::async_trait]
impl SourceProvider for LocalGitProvider {
    fn name(&self) -> &str {
        "local"
    }

    #[instrument(skip(self))]
    async fn get_latest_release(&self, _owner: &str, _repo: &str) -> Result<Option<Release>> {
        let latest = self.with_repo(|repo| repo.find_latest_tag()).await?;
        Ok(latest.and_then(tag_to_release))
    }

    #[instrument(skip(self))]
    async fn get_release_by_tag(
        &self,
        _owner: &str,
        _repo: &str,
        tag: &str,
    ) -> Result<Option<Release>> {
        let name = tag.to_string();
        let found = self.with_repo(move |repo| repo.find_tag(&name)).await?;
        Ok(found.and_then(tag_to_release))
    }

    #[instrument(skip(self, query))]
    async fn find_changelog(
        &self,
        _owner: &str,
        _repo: &str,
        query: &ChangelogQuery,
    ) -> Result<Option<ChangelogFile>> {
        let query = query.clone();
        self.with_repo(move |repo| {
            for path in &query.paths {
                if let Some(content) = repo.read_file(path, query.git_ref.as_deref())? {
                    debug!(path = %path, "found changelog");
                    return Ok(Some(ChangelogFile {
                        path: path.clone(),
                        content,
                    }));
                }
            }
            Ok(None)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn get_tags(&self, _owner: &str, _repo: &str, query: &TagQuery) -> Result<Vec<Tag>> {
        let limit = query.limit;
        let tags = self.with_repo(|repo| repo.sorted_tags()).await?;
        Ok(tags
            .into_iter()
            .take(limit)
            .map(|t| Tag::new(t.name, t.commit_hash))
            .collect())
    }

    #[instrument(skip(self))]
    async fn compare(
        &self,
        _owner: &str,
        _repo: &str,
        base: Option<&str>,
        head: &str,
    ) -> Result<Comparison> {
        let base = base.map(str::to_string);
        let head = head.to_string();
        let limit = self.max_commits;

        let commits = self
            .with_repo(move |repo| {
                if !repo.has_commits() {
                    return Ok(Vec::new());
                }
                repo.commits_between(base.as_deref(), &head, limit)
            })
            .await?;

        debug!(count = commits.len(), "compared revisions");
        Ok(Comparison {
            commits: commits
                .into_iter()
                .map(|c| CommitSummary::new(c.hash.clone(), c.full_message()))
                .collect(),
            url: None,
        })
    }
}
