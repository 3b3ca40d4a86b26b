//! Release note aggregation pipeline
//!
//! A run walks through five phases, each taking a [`PipelineContext`] and
//! returning the next one:
//!
//! 1. primary: release and changelog sources in priority order
//! 2. commits: commit history between the release and the previous tag
//! 3. merge: commit items the primary result does not already cover
//! 4. AI: replaces the categories when the quality gate fails
//! 5. quality filter: drops low-scoring items and empty categories

mod context;
mod merge;

pub use context::PipelineContext;
pub use merge::merge_results;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, trace, warn};
use whatsnew_core::config::Config;
use whatsnew_core::{ExtractedItem, SourceResult};
use whatsnew_extract::{extract_anchors, order_categories, ExtractorRegistry};

use crate::ai::{reconcile_ai_categories, AiExtractor, DisabledAiExtractor};
use crate::error::{PipelineError, Result};
use crate::provider::SourceProvider;
use crate::quality::QualityAssessor;
use crate::sources::{
    ChangelogSource, CommitHistorySource, DataSource, ReleaseSource, SourceKind,
};
use crate::validator::{HeuristicValidator, TextValidator};

/// Name recorded in `sources_used` when AI replaced the categories
pub const AI_SOURCE: &str = "ai";

/// Tunables for a pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    /// Upper bound on a single AI extraction
    pub ai_timeout: Duration,
    /// Confidence reported for AI-enhanced results, at least
    pub ai_confidence_floor: f64,
    /// Scored items below this are dropped
    pub min_item_score: f64,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            ai_timeout: Duration::from_secs(60),
            ai_confidence_floor: 0.8,
            min_item_score: 0.25,
        }
    }
}

/// Aggregates release notes from several sources
pub struct Pipeline {
    sources: Vec<Arc<dyn DataSource>>,
    ai: Arc<dyn AiExtractor>,
    validator: Arc<dyn TextValidator>,
    assessor: QualityAssessor,
    options: PipelineOptions,
}

impl Pipeline {
    /// Create a pipeline over `sources`, ordered by priority
    pub fn new(mut sources: Vec<Arc<dyn DataSource>>) -> Self {
        sources.sort_by_key(|s| s.priority());
        Self {
            sources,
            ai: Arc::new(DisabledAiExtractor),
            validator: Arc::new(HeuristicValidator::default()),
            assessor: QualityAssessor::default(),
            options: PipelineOptions::default(),
        }
    }

    /// Create a pipeline with the enabled sources of `config`, all reading
    /// from `provider`
    pub fn from_config(config: &Config, provider: Arc<dyn SourceProvider>) -> Self {
        let registry = Arc::new(ExtractorRegistry::new());
        let mut sources: Vec<Arc<dyn DataSource>> = Vec::new();

        let release = &config.sources.release;
        if release.enabled {
            sources.push(Arc::new(
                ReleaseSource::new(provider.clone(), registry.clone())
                    .with_priority(release.priority)
                    .with_min_confidence(release.min_confidence),
            ));
        }

        let changelog = &config.sources.changelog;
        if changelog.enabled {
            sources.push(Arc::new(
                ChangelogSource::new(provider.clone(), registry.clone())
                    .with_paths(changelog.paths.clone())
                    .with_priority(changelog.priority)
                    .with_min_confidence(changelog.min_confidence),
            ));
        }

        let commits = &config.sources.commits;
        if commits.enabled {
            sources.push(Arc::new(
                CommitHistorySource::new(provider)
                    .with_tag_limit(config.provider.tag_limit)
                    .with_priority(commits.priority)
                    .with_min_confidence(commits.min_confidence),
            ));
        }

        Self::new(sources)
            .with_validator(Arc::new(HeuristicValidator::new(
                config.quality.min_text_length,
            )))
            .with_quality_assessor(QualityAssessor::new(config.quality.confidence_threshold))
            .with_options(PipelineOptions {
                ai_timeout: Duration::from_secs(config.ai.timeout_secs),
                ai_confidence_floor: config.ai.confidence_floor,
                min_item_score: config.quality.min_item_score,
            })
    }

    pub fn with_ai(mut self, ai: Arc<dyn AiExtractor>) -> Self {
        self.ai = ai;
        self
    }

    pub fn with_validator(mut self, validator: Arc<dyn TextValidator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_quality_assessor(mut self, assessor: QualityAssessor) -> Self {
        self.assessor = assessor;
        self
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Source names in the order they run
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Run every phase for a repository.
    ///
    /// Fails with [`PipelineError::NotFound`] when no source produced
    /// anything.
    #[instrument(skip(self), fields(sources = self.sources.len()))]
    pub async fn run(&self, owner: &str, repo: &str, tag: Option<&str>) -> Result<PipelineContext> {
        let ctx = PipelineContext::new(owner, repo, tag.map(str::to_string));

        let ctx = self.fetch_primary(ctx).await;
        let ctx = self.fetch_commits(ctx).await;
        let ctx = self.merge(ctx);
        let ctx = self.enhance_with_ai(ctx).await;
        let ctx = self.filter_quality(ctx);

        let Some(result) = ctx.final_result() else {
            return Err(PipelineError::NotFound {
                owner: owner.to_string(),
                repo: repo.to_string(),
            });
        };
        info!(
            source = %result.source,
            items = result.total_items(),
            confidence = result.confidence,
            sources_used = ?ctx.sources_used(),
            ai_enhanced = ctx.ai_enhanced(),
            "pipeline finished"
        );

        Ok(ctx)
    }

    /// Try release and changelog sources in priority order.
    ///
    /// The first result at or above its source's minimum confidence wins.
    /// Otherwise the most confident result seen is kept. Source errors are
    /// logged and skipped.
    pub async fn fetch_primary(&self, ctx: PipelineContext) -> PipelineContext {
        let request = ctx.request();
        let mut fallback: Option<(String, SourceResult)> = None;

        for source in self
            .sources
            .iter()
            .filter(|s| s.kind() != SourceKind::CommitHistory)
        {
            let result = match source.fetch(&request).await {
                Ok(Some(result)) => result,
                Ok(None) => {
                    debug!(source = source.name(), "source had nothing");
                    continue;
                }
                Err(e) => {
                    warn!(source = source.name(), error = %e, "source failed");
                    continue;
                }
            };

            if result.confidence >= source.min_confidence() {
                info!(
                    source = source.name(),
                    confidence = result.confidence,
                    "accepted source"
                );
                return ctx
                    .with_primary_result(result)
                    .with_source_used(source.name());
            }

            debug!(
                source = source.name(),
                confidence = result.confidence,
                min_confidence = source.min_confidence(),
                "source below its minimum confidence"
            );
            let better = fallback
                .as_ref()
                .map_or(true, |(_, best)| result.confidence > best.confidence);
            if better {
                fallback = Some((source.name().to_string(), result));
            }
        }

        match fallback {
            Some((name, result)) => {
                info!(source = %name, confidence = result.confidence, "using best low-confidence source");
                ctx.with_primary_result(result).with_source_used(name)
            }
            None => ctx,
        }
    }

    /// Collect commit history. Failures leave the context unchanged.
    pub async fn fetch_commits(&self, ctx: PipelineContext) -> PipelineContext {
        let Some(source) = self
            .sources
            .iter()
            .find(|s| s.kind() == SourceKind::CommitHistory)
        else {
            return ctx;
        };

        match source.fetch(&ctx.request()).await {
            Ok(Some(result)) => {
                debug!(items = result.total_items(), "fetched commit history");
                ctx.with_commit_result(result)
                    .with_source_used(source.name())
            }
            Ok(None) => ctx,
            Err(e) => {
                warn!(source = source.name(), error = %e, "commit history unavailable");
                ctx
            }
        }
    }

    /// Combine the primary and commit results into the final result
    pub fn merge(&self, ctx: PipelineContext) -> PipelineContext {
        let merged = merge_results(ctx.primary_result().cloned(), ctx.commit_result().cloned());
        ctx.with_final_result(merged)
    }

    /// Replace the categories with AI output when the quality gate fails.
    ///
    /// Timeouts and extractor errors keep the deterministic result.
    pub async fn enhance_with_ai(&self, ctx: PipelineContext) -> PipelineContext {
        let Some(result) = ctx.final_result().cloned() else {
            return ctx;
        };

        let assessment = self.assessor.assess(
            &result.categories,
            result.confidence,
            result.metadata.raw_content_len(),
        );
        debug!(score = assessment.score, reasons = ?assessment.reasons, "assessed quality");
        let should_fallback = assessment.should_fallback_to_ai;
        let ctx = ctx.with_assessment(assessment);

        if !should_fallback {
            return ctx;
        }
        if !self.ai.is_available() {
            debug!("quality gate failed but no AI extractor is available");
            return ctx;
        }
        let raw = result.metadata.raw_content.as_deref().unwrap_or_default();
        if raw.trim().is_empty() {
            return ctx;
        }

        let anchors = extract_anchors(raw);
        let extraction =
            match tokio::time::timeout(self.options.ai_timeout, self.ai.extract(raw, &anchors))
                .await
            {
                Ok(Ok(Some(extraction))) if extraction.total_items() > 0 => extraction,
                Ok(Ok(_)) => {
                    debug!("AI extraction returned nothing");
                    return ctx;
                }
                Ok(Err(e)) => {
                    warn!(error = %e, "AI extraction failed");
                    return ctx;
                }
                Err(_) => {
                    warn!(
                        timeout_secs = self.options.ai_timeout.as_secs(),
                        "AI extraction timed out"
                    );
                    return ctx;
                }
            };

        let categories = order_categories(reconcile_ai_categories(
            extraction.categories,
            &result.categories,
            &anchors,
        ));
        let enhanced = SourceResult {
            categories,
            confidence: result.confidence.max(self.options.ai_confidence_floor),
            ..result
        };
        info!(items = enhanced.total_items(), "AI replaced categories");

        ctx.with_final_result(Some(enhanced))
            .with_ai_enhanced()
            .with_source_used(AI_SOURCE)
    }

    /// Drop low-quality items and the categories left empty
    pub fn filter_quality(&self, ctx: PipelineContext) -> PipelineContext {
        let Some(mut result) = ctx.final_result().cloned() else {
            return ctx;
        };

        result.categories = std::mem::take(&mut result.categories)
            .into_iter()
            .filter_map(|mut category| {
                category.items.retain(|item| self.keep_item(item));
                (!category.is_empty()).then_some(category)
            })
            .collect();

        ctx.with_final_result(Some(result))
    }

    fn keep_item(&self, item: &ExtractedItem) -> bool {
        let keep = match item.score {
            Some(score) => score >= self.options.min_item_score,
            None => self.validator.validate(&item.text).valid,
        };
        if !keep {
            trace!(text = %item.text, score = ?item.score, "dropped item");
        }
        keep
    }
}
