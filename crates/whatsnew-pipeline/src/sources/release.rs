//! Published release notes

use std::sync::Arc;

use tracing::{debug, instrument};
use whatsnew_core::{SourceMetadata, SourceResult};
use whatsnew_extract::ExtractorRegistry;
use whatsnew_git::types::extract_version;

use super::{extraction_to_result, DataSource, FetchRequest, SourceKind};
use crate::error::Result;
use crate::provider::SourceProvider;

/// Reads the release body a provider publishes for a tag
pub struct ReleaseSource {
    provider: Arc<dyn SourceProvider>,
    registry: Arc<ExtractorRegistry>,
    priority: u32,
    min_confidence: f64,
}

impl ReleaseSource {
    pub fn new(provider: Arc<dyn SourceProvider>, registry: Arc<ExtractorRegistry>) -> Self {
        Self {
            provider,
            registry,
            priority: 1,
            min_confidence: 0.7,
        }
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
impl DataSource for ReleaseSource {
    fn name(&self) -> &str {
        "release"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Release
    }

    fn priority(&self) -> u32 {
        self.priority
    }

    fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    #[instrument(skip(self, request), fields(owner = %request.owner, repo = %request.repo, tag = ?request.tag))]
    async fn fetch(&self, request: &FetchRequest) -> Result<Option<SourceResult>> {
        let release = match &request.tag {
            Some(tag) => {
                self.provider
                    .get_release_by_tag(&request.owner, &request.repo, tag)
                    .await?
            }
            None => {
                self.provider
                    .get_latest_release(&request.owner, &request.repo)
                    .await?
            }
        };

        let Some(release) = release else {
            debug!("no release found");
            return Ok(None);
        };
        if release.body.trim().is_empty() {
            debug!(tag = %release.tag, "release has an empty body");
            return Ok(None);
        }

        let extraction = self
            .registry
            .extract_auto(&release.body, None, release.format_hint);

        let metadata = SourceMetadata {
            raw_content: Some(release.body.clone()),
            version: extraction
                .metadata
                .version
                .clone()
                .or_else(|| extract_version(&release.tag)),
            date: release.published_at.clone(),
            tag: Some(release.tag.clone()),
            compare_url: extraction.metadata.compare_url.clone(),
            commit_count: None,
        };

        Ok(Some(extraction_to_result(self.name(), extraction, metadata)))
    }
}
