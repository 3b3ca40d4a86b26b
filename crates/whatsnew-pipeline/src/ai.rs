//! AI-assisted extraction
//!
//! The pipeline only calls an [`AiExtractor`] when deterministic parsing
//! produced a poor result. Whatever the model returns is grounded before
//! use: references must exist in the raw text or the deterministic parse,
//! and references the deterministic parse found are carried over.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;
use whatsnew_core::{Category, CategoryId, ExtractedItem};
use whatsnew_extract::text::normalize_text;
use whatsnew_extract::{format_anchors_for_prompt, Anchors};

use crate::error::Result;

/// Token overlap at which two item texts are considered the same change
const TOKEN_OVERLAP_THRESHOLD: f64 = 0.5;

/// Categories produced by an AI extractor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiExtraction {
    pub categories: Vec<Category>,
    #[serde(default)]
    pub has_breaking_changes: bool,
}

impl AiExtraction {
    /// Total number of items
    pub fn total_items(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }
}

/// Model-backed extraction strategy
#[async_trait::async_trait]
pub trait AiExtractor: Send + Sync {
    /// Whether the extractor can be called at all
    fn is_available(&self) -> bool;

    /// Extract categories from raw release text.
    ///
    /// `anchors` lists the references that exist in `raw`; implementations
    /// should only cite those.
    async fn extract(&self, raw: &str, anchors: &Anchors) -> Result<Option<AiExtraction>>;
}

/// Extractor used when no model is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledAiExtractor;

#[async_trait::async_trait]
impl AiExtractor for DisabledAiExtractor {
    fn is_available(&self) -> bool {
        false
    }

    async fn extract(&self, _raw: &str, _anchors: &Anchors) -> Result<Option<AiExtraction>> {
        Ok(None)
    }
}

/// Render the prompt a model-backed extractor sends
pub fn build_extraction_prompt(raw: &str, anchors: &Anchors) -> String {
    let categories = CategoryId::ORDER
        .iter()
        .map(|id| format!("- {} ({})", id.as_str(), id.title()))
        .collect::<Vec<_>>()
        .join("\n");

    let mut prompt = format!(
        "Extract the user-facing changes from the release notes below.\n\
         Group every change into exactly one of these categories:\n{}\n\n\
         Respond with JSON: {{\"categories\": [{{\"id\": \"features\", \"title\": \"Features\", \
         \"items\": [{{\"text\": \"...\", \"refs\": [\"123\"]}}]}}], \"hasBreakingChanges\": false}}\n\
         Keep item text short and do not invent changes.\n",
        categories
    );

    let grounding = format_anchors_for_prompt(anchors);
    if grounding.is_empty() {
        prompt.push_str("The text contains no references; leave refs empty.\n");
    } else {
        prompt.push_str("Only cite references from this list:\n");
        prompt.push_str(&grounding);
        prompt.push('\n');
    }

    prompt.push_str("\nRelease notes:\n---\n");
    prompt.push_str(raw.trim());
    prompt.push_str("\n---\n");
    prompt
}

/// Ground AI categories against the deterministic parse.
///
/// AI references that are neither anchors nor deterministic references are
/// dropped. Each deterministic item's references are then attached to the
/// AI item describing the same change.
pub fn reconcile_ai_categories(
    ai_categories: Vec<Category>,
    deterministic: &[Category],
    anchors: &Anchors,
) -> Vec<Category> {
    let known: HashSet<&str> = deterministic
        .iter()
        .flat_map(|c| c.items.iter())
        .flat_map(|i| i.refs.iter().map(String::as_str))
        .collect();

    let mut categories: Vec<Category> = ai_categories
        .into_iter()
        .map(|mut category| {
            for item in &mut category.items {
                let before = item.refs.len();
                item.refs
                    .retain(|r| anchors.knows_ref(r) || known.contains(r.as_str()));
                if item.refs.len() != before {
                    debug!(text = %item.text, dropped = before - item.refs.len(), "dropped ungrounded refs");
                }
            }
            category
        })
        .collect();

    for source in deterministic.iter().flat_map(|c| c.items.iter()) {
        if source.refs.is_empty() {
            continue;
        }
        if let Some(target) = find_matching_item(&mut categories, source) {
            target.extend_refs(source.refs.iter().cloned());
        }
    }

    categories
}

fn find_matching_item<'a>(
    categories: &'a mut [Category],
    source: &ExtractedItem,
) -> Option<&'a mut ExtractedItem> {
    let wanted = normalize_text(&source.text);
    if wanted.is_empty() {
        return None;
    }

    let mut best: Option<(usize, usize, f64)> = None;
    for (ci, category) in categories.iter().enumerate() {
        for (ii, item) in category.items.iter().enumerate() {
            let candidate = normalize_text(&item.text);
            if candidate.is_empty() {
                continue;
            }
            let score = if candidate == wanted {
                1.0
            } else if candidate.contains(&wanted) || wanted.contains(&candidate) {
                0.99
            } else {
                token_overlap(&candidate, &wanted)
            };
            if score >= TOKEN_OVERLAP_THRESHOLD && best.map_or(true, |(_, _, s)| score > s) {
                best = Some((ci, ii, score));
            }
        }
    }

    let (ci, ii, _) = best?;
    categories.get_mut(ci)?.items.get_mut(ii)
}

/// Jaccard similarity of the two texts' word sets
fn token_overlap(a: &str, b: &str) -> f64 {
    let left: HashSet<&str> = a.split_whitespace().collect();
    let right: HashSet<&str> = b.split_whitespace().collect();
    let union = left.union(&right).count();
    if union == 0 {
        return 0.0;
    }
    left.intersection(&right).count() as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use whatsnew_extract::extract_anchors;

    fn category(id: CategoryId, items: Vec<ExtractedItem>) -> Category {
        Category::with_items(id, items)
    }

    #[tokio::test]
    async fn test_disabled_extractor() {
        let ai = DisabledAiExtractor;
        assert!(!ai.is_available());
        assert!(ai.extract("text", &Anchors::default()).await.unwrap().is_none());
    }

    #[test]
    fn test_prompt_contains_anchors_and_text() {
        let raw = "- Add widget (#12)";
        let prompt = build_extraction_prompt(raw, &extract_anchors(raw));
        assert!(prompt.contains("PR references: #12"));
        assert!(prompt.contains("- Add widget (#12)"));
        assert!(prompt.contains("breaking (Breaking Changes)") || prompt.contains("- breaking"));
    }

    #[test]
    fn test_prompt_without_anchors() {
        let prompt = build_extraction_prompt("Small tweaks", &Anchors::default());
        assert!(prompt.contains("leave refs empty"));
    }

    #[test]
    fn test_ungrounded_refs_are_dropped() {
        let anchors = extract_anchors("Fixed the thing (#12)");
        let ai = vec![category(
            CategoryId::Fixes,
            vec![ExtractedItem::new("Fixed the thing").with_refs(["12", "999"])],
        )];

        let grounded = reconcile_ai_categories(ai, &[], &anchors);
        assert_eq!(grounded[0].items[0].refs, vec!["12"]);
    }

    #[test]
    fn test_deterministic_refs_are_reattached() {
        let deterministic = vec![category(
            CategoryId::Other,
            vec![
                ExtractedItem::new("Improve the loading speed of dashboards").with_refs(["40"]),
                ExtractedItem::new("add endpoint").with_refs(["41"]),
            ],
        )];
        let ai = vec![
            category(
                CategoryId::Perf,
                vec![ExtractedItem::new("Improve loading speed of the dashboards")],
            ),
            category(
                CategoryId::Features,
                vec![ExtractedItem::new("Add endpoint for exports")],
            ),
        ];

        let grounded = reconcile_ai_categories(ai, &deterministic, &Anchors::default());
        assert_eq!(grounded[0].items[0].refs, vec!["40"]);
        assert_eq!(grounded[1].items[0].refs, vec!["41"]);
    }

    #[test]
    fn test_token_overlap() {
        assert_eq!(token_overlap("a b", "a b"), 1.0);
        assert_eq!(token_overlap("a b", "c d"), 0.0);
        assert!((token_overlap("a b c", "a b d") - 0.5).abs() < f64::EPSILON);
    }
}
