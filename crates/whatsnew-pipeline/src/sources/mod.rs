//! Data sources
//!
//! A data source turns one kind of release information (published
//! release, changelog file, commit history) into a categorized
//! [`SourceResult`]. The pipeline only sees the [`DataSource`] trait and
//! walks sources in priority order.

mod changelog;
mod commits;
mod release;

pub use changelog::ChangelogSource;
pub use commits::CommitHistorySource;
pub use release::ReleaseSource;

use serde::{Deserialize, Serialize};
use whatsnew_core::{SourceMetadata, SourceResult};
use whatsnew_extract::{categorize_items, Extraction};

use crate::error::Result;

/// Kind of release information a source reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Release,
    Changelog,
    CommitHistory,
}

/// What the pipeline asks a source for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub owner: String,
    pub repo: String,
    /// Release tag; the latest release when `None`
    pub tag: Option<String>,
}

impl FetchRequest {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, tag: Option<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            tag,
        }
    }
}

/// A source of release information
#[async_trait::async_trait]
pub trait DataSource: Send + Sync {
    /// Source name, recorded in `sources_used`
    fn name(&self) -> &str;

    fn kind(&self) -> SourceKind;

    /// Lower runs first
    fn priority(&self) -> u32;

    /// Confidence at which the pipeline accepts this source's result
    fn min_confidence(&self) -> f64;

    /// Fetch and categorize. `Ok(None)` means the source has nothing.
    async fn fetch(&self, request: &FetchRequest) -> Result<Option<SourceResult>>;
}

/// Categorize an extraction into a result carrying `metadata`
pub(crate) fn extraction_to_result(
    source: &str,
    extraction: Extraction,
    metadata: SourceMetadata,
) -> SourceResult {
    let confidence = extraction.metadata.format_confidence;
    SourceResult::new(source, categorize_items(extraction.items), confidence).with_metadata(metadata)
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory provider for source and pipeline tests

    use std::collections::HashMap;

    use crate::error::{PipelineError, Result};
    use crate::provider::{
        ChangelogFile, ChangelogQuery, CommitSummary, Comparison, Release, SourceProvider, Tag,
        TagQuery,
    };

    #[derive(Default)]
    pub struct MemoryProvider {
        pub releases: Vec<Release>,
        pub changelogs: HashMap<String, String>,
        pub tags: Vec<Tag>,
        pub commits: Vec<CommitSummary>,
        pub fail: bool,
    }

    impl MemoryProvider {
        fn check(&self) -> Result<()> {
            if self.fail {
                Err(PipelineError::provider("unavailable"))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait::async_trait]
    impl SourceProvider for MemoryProvider {
        fn name(&self) -> &str {
            "memory"
        }

        async fn get_latest_release(&self, _owner: &str, _repo: &str) -> Result<Option<Release>> {
            self.check()?;
            Ok(self.releases.first().cloned())
        }

        async fn get_release_by_tag(
            &self,
            _owner: &str,
            _repo: &str,
            tag: &str,
        ) -> Result<Option<Release>> {
            self.check()?;
            Ok(self.releases.iter().find(|r| r.tag == tag).cloned())
        }

        async fn find_changelog(
            &self,
            _owner: &str,
            _repo: &str,
            query: &ChangelogQuery,
        ) -> Result<Option<ChangelogFile>> {
            self.check()?;
            Ok(query.paths.iter().find_map(|path| {
                self.changelogs.get(path).map(|content| ChangelogFile {
                    path: path.clone(),
                    content: content.clone(),
                })
            }))
        }

        async fn get_tags(&self, _owner: &str, _repo: &str, query: &TagQuery) -> Result<Vec<Tag>> {
            self.check()?;
            Ok(self.tags.iter().take(query.limit).cloned().collect())
        }

        async fn compare(
            &self,
            _owner: &str,
            _repo: &str,
            base: Option<&str>,
            head: &str,
        ) -> Result<Comparison> {
            self.check()?;
            Ok(Comparison {
                commits: self.commits.clone(),
                url: base.map(|b| format!("https://github.com/o/r/compare/{}...{}", b, head)),
            })
        }
    }
}
