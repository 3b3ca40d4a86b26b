//! Pipeline state threaded through the phases

use serde::Serialize;
use whatsnew_core::SourceResult;

use crate::quality::QualityAssessment;
use crate::sources::FetchRequest;

/// Snapshot of a pipeline run.
///
/// Phases never mutate a context; each consumes one and returns the next.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineContext {
    owner: String,
    repo: String,
    tag: Option<String>,
    primary_result: Option<SourceResult>,
    commit_result: Option<SourceResult>,
    final_result: Option<SourceResult>,
    assessment: Option<QualityAssessment>,
    sources_used: Vec<String>,
    ai_enhanced: bool,
}

impl PipelineContext {
    /// Start a run for a repository and optional tag
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, tag: Option<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            tag,
            primary_result: None,
            commit_result: None,
            final_result: None,
            assessment: None,
            sources_used: Vec::new(),
            ai_enhanced: false,
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Result of the first accepted (or best fallback) source
    pub fn primary_result(&self) -> Option<&SourceResult> {
        self.primary_result.as_ref()
    }

    /// Result built from commit history
    pub fn commit_result(&self) -> Option<&SourceResult> {
        self.commit_result.as_ref()
    }

    /// The result the run produced
    pub fn final_result(&self) -> Option<&SourceResult> {
        self.final_result.as_ref()
    }

    /// Quality verdict on the merged result, once assessed
    pub fn assessment(&self) -> Option<&QualityAssessment> {
        self.assessment.as_ref()
    }

    /// Names of the sources that contributed, in order
    pub fn sources_used(&self) -> &[String] {
        &self.sources_used
    }

    /// Whether AI extraction replaced the deterministic categories
    pub fn ai_enhanced(&self) -> bool {
        self.ai_enhanced
    }

    /// The request every source receives
    pub fn request(&self) -> FetchRequest {
        FetchRequest::new(&self.owner, &self.repo, self.tag.clone())
    }

    pub fn with_primary_result(self, result: SourceResult) -> Self {
        Self {
            primary_result: Some(result),
            ..self
        }
    }

    pub fn with_commit_result(self, result: SourceResult) -> Self {
        Self {
            commit_result: Some(result),
            ..self
        }
    }

    pub fn with_final_result(self, result: Option<SourceResult>) -> Self {
        Self {
            final_result: result,
            ..self
        }
    }

    pub fn with_assessment(self, assessment: QualityAssessment) -> Self {
        Self {
            assessment: Some(assessment),
            ..self
        }
    }

    pub fn with_source_used(self, source: impl Into<String>) -> Self {
        let mut sources_used = self.sources_used.clone();
        sources_used.push(source.into());
        Self {
            sources_used,
            ..self
        }
    }

    pub fn with_ai_enhanced(self) -> Self {
        Self {
            ai_enhanced: true,
            ..self
        }
    }
}
