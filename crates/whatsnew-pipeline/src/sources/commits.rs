//! Commit history between releases

use std::sync::Arc;

use tracing::{debug, instrument};
use whatsnew_core::{SourceMetadata, SourceResult};
use whatsnew_extract::{categorize_items, detect_format, extract_commit_message};
use whatsnew_git::types::extract_version;

use super::{DataSource, FetchRequest, SourceKind};
use crate::error::Result;
use crate::provider::{SourceProvider, TagQuery};

/// Revision used when the repository has no tags
const HEAD: &str = "HEAD";

/// Builds a result from the commits since the previous tag
pub struct CommitHistorySource {
    provider: Arc<dyn SourceProvider>,
    tag_limit: usize,
    priority: u32,
    min_confidence: f64,
}

impl CommitHistorySource {
    pub fn new(provider: Arc<dyn SourceProvider>) -> Self {
        Self {
            provider,
            tag_limit: TagQuery::default().limit,
            priority: 3,
            min_confidence: 0.0,
        }
    }

    /// Number of tags listed when looking for the previous release
    pub fn with_tag_limit(mut self, tag_limit: usize) -> Self {
        self.tag_limit = tag_limit;
        self
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }
}

#[async_trait::async_trait]
impl DataSource for CommitHistorySource {
    fn name(&self) -> &str {
        "commits"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::CommitHistory
    }

    fn priority(&self) -> u32 {
        self.priority
    }

    fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    #[instrument(skip(self, request), fields(owner = %request.owner, repo = %request.repo, tag = ?request.tag))]
    async fn fetch(&self, request: &FetchRequest) -> Result<Option<SourceResult>> {
        let tags = self
            .provider
            .get_tags(
                &request.owner,
                &request.repo,
                &TagQuery {
                    limit: self.tag_limit,
                },
            )
            .await?;

        let head = request
            .tag
            .clone()
            .or_else(|| tags.first().map(|t| t.name.clone()))
            .unwrap_or_else(|| HEAD.to_string());
        let base = tags
            .iter()
            .position(|t| t.name == head)
            .and_then(|pos| tags.get(pos + 1))
            .map(|t| t.name.clone());
        debug!(head = %head, base = ?base, "resolved commit range");

        let comparison = self
            .provider
            .compare(&request.owner, &request.repo, base.as_deref(), &head)
            .await?;
        if comparison.commits.is_empty() {
            debug!("no commits in range");
            return Ok(None);
        }

        let subjects: Vec<&str> = comparison
            .commits
            .iter()
            .filter_map(|c| c.message.lines().next())
            .collect();
        let raw_content = subjects.join("\n");
        let detection = detect_format(&raw_content);

        let items = comparison
            .commits
            .iter()
            .flat_map(|c| extract_commit_message(&c.message))
            .collect();

        let tag = (head != HEAD).then(|| head.clone());
        let metadata = SourceMetadata {
            version: tag.as_deref().and_then(extract_version),
            tag,
            compare_url: comparison.url.clone(),
            commit_count: Some(comparison.commits.len()),
            raw_content: Some(raw_content),
            date: None,
        };

        Ok(Some(
            SourceResult::new(self.name(), categorize_items(items), detection.confidence)
                .with_metadata(metadata),
        ))
    }
}
