//! whatsnew Pipeline - Sources, providers and release note aggregation
//!
//! Providers talk to where a repository lives (a local clone or the
//! GitHub API). Data sources use a provider to read one kind of release
//! information and categorize it. The pipeline walks the sources, merges
//! commit history in, optionally hands poor results to an AI extractor and
//! filters what is left.

pub mod ai;
pub mod error;
pub mod github;
pub mod local;
pub mod pipeline;
pub mod provider;
pub mod quality;
pub mod sources;
pub mod validator;

pub use ai::{build_extraction_prompt, reconcile_ai_categories, AiExtraction, AiExtractor, DisabledAiExtractor};
pub use error::{PipelineError, Result};
pub use github::{GitHubConfig, GitHubProvider};
pub use local::LocalGitProvider;
pub use pipeline::{merge_results, Pipeline, PipelineContext, PipelineOptions};
pub use provider::{
    ChangelogFile, ChangelogQuery, CommitSummary, Comparison, Release, SourceProvider, Tag,
    TagQuery,
};
pub use quality::{QualityAssessment, QualityAssessor, QualityReason};
pub use sources::{
    ChangelogSource, CommitHistorySource, DataSource, FetchRequest, ReleaseSource, SourceKind,
};
pub use validator::{HeuristicValidator, TextValidator, Validation};
