//! Changelog files

use std::sync::Arc;

use tracing::{debug, instrument};
use whatsnew_core::config::default_changelog_paths;
use whatsnew_core::{SourceMetadata, SourceResult};
use whatsnew_extract::ExtractorRegistry;
use whatsnew_git::types::extract_version;

use super::{extraction_to_result, DataSource, FetchRequest, SourceKind};
use crate::error::Result;
use crate::provider::{ChangelogQuery, SourceProvider};

/// Reads the block for a release out of the repository's changelog
pub struct ChangelogSource {
    provider: Arc<dyn SourceProvider>,
    registry: Arc<ExtractorRegistry>,
    paths: Vec<String>,
    priority: u32,
    min_confidence: f64,
}

impl ChangelogSource {
    pub fn new(provider: Arc<dyn SourceProvider>, registry: Arc<ExtractorRegistry>) -> Self {
        Self {
            provider,
            registry,
            paths: default_changelog_paths(),
            priority: 2,
            min_confidence: 0.6,
        }
    }

    /// Candidate changelog paths, tried in order
    pub fn with_paths(mut self, paths: Vec<String>) -> Self {
        self.paths = paths;
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
impl DataSource for ChangelogSource {
    fn name(&self) -> &str {
        "changelog"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Changelog
    }

    fn priority(&self) -> u32 {
        self.priority
    }

    fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    #[instrument(skip(self, request), fields(owner = %request.owner, repo = %request.repo, tag = ?request.tag))]
    async fn fetch(&self, request: &FetchRequest) -> Result<Option<SourceResult>> {
        let query = ChangelogQuery {
            git_ref: request.tag.clone(),
            paths: self.paths.clone(),
        };
        let Some(file) = self
            .provider
            .find_changelog(&request.owner, &request.repo, &query)
            .await?
        else {
            debug!("no changelog file found");
            return Ok(None);
        };
        if file.content.trim().is_empty() {
            return Ok(None);
        }

        let target = request
            .tag
            .as_deref()
            .map(|tag| extract_version(tag).unwrap_or_else(|| tag.to_string()));
        let extraction = self
            .registry
            .extract_auto(&file.content, target.as_deref(), None);
        debug!(
            path = %file.path,
            version = ?extraction.metadata.version,
            items = extraction.items.len(),
            "extracted changelog"
        );
        if extraction.items.is_empty() {
            debug!(path = %file.path, target = ?target, "changelog has nothing for this release");
            return Ok(None);
        }

        let metadata = SourceMetadata {
            raw_content: Some(
                extraction
                    .metadata
                    .scoped_content
                    .clone()
                    .unwrap_or_else(|| file.content.clone()),
            ),
            version: extraction.metadata.version.clone(),
            date: extraction.metadata.date.clone(),
            tag: request.tag.clone(),
            compare_url: extraction.metadata.compare_url.clone(),
            commit_count: None,
        };

        Ok(Some(extraction_to_result(self.name(), extraction, metadata)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::testing::MemoryProvider;
    use whatsnew_core::CategoryId;

    const CHANGELOG: &str = "\
# Changelog

## [1.1.0] - 2024-03-01

### Added

- Export to CSV (#20)

### Fixed

- Crash when the list is empty

## [1.0.0] - 2024-01-01

### Added

- Initial release
";

    fn source() -> ChangelogSource {
        let mut provider = MemoryProvider::default();
        provider
            .changelogs
            .insert("CHANGELOG.md".to_string(), CHANGELOG.to_string());
        ChangelogSource::new(Arc::new(provider), Arc::new(ExtractorRegistry::new()))
    }

    #[tokio::test]
    async fn test_fetch_version_block() {
        let result = source()
            .fetch(&FetchRequest::new("o", "r", Some("v1.0.0".to_string())))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(result.source, "changelog");
        assert_eq!(result.confidence, 0.9);
        assert_eq!(result.metadata.version.as_deref(), Some("1.0.0"));
        assert_eq!(result.total_items(), 1);

        let raw = result.metadata.raw_content.unwrap();
        assert!(raw.contains("Initial release"));
        assert!(!raw.contains("Export to CSV"));
    }

    #[tokio::test]
    async fn test_fetch_latest_block() {
        let result = source()
            .fetch(&FetchRequest::new("o", "r", None))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(result.metadata.version.as_deref(), Some("1.1.0"));
        assert_eq!(result.metadata.date.as_deref(), Some("2024-03-01"));
        assert_eq!(result.category(CategoryId::Features).unwrap().items.len(), 1);
        assert_eq!(result.category(CategoryId::Fixes).unwrap().items.len(), 1);
    }

    #[tokio::test]
    async fn test_unlisted_version_is_unavailable() {
        let result = source()
            .fetch(&FetchRequest::new("o", "r", Some("v1.0.5".to_string())))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_missing_changelog() {
        let source = ChangelogSource::new(
            Arc::new(MemoryProvider::default()),
            Arc::new(ExtractorRegistry::new()),
        );
        let result = source
            .fetch(&FetchRequest::new("o", "r", None))
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
