//! Category inference
//!
//! Each item is assigned a category by the first tier that has a signal:
//! explicit breaking flag, conventional commit type, section hint,
//! keyword analysis, and finally whatever hint the extractor left behind.

mod keywords;
mod sections;

pub use keywords::{score_keywords, KEYWORD_THRESHOLD};
pub use sections::{map_section_to_category, normalize_section_name};

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;
use whatsnew_core::{Category, CategoryId, ExtractedItem};

/// `type(scope)!: ` at the start of the text
static TYPE_AT_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<type>[a-zA-Z]+)(?:\([^)]*\))?!?:\s").expect("Invalid regex")
});

/// `[label](url) type: ` - a leading markdown link, then the type
static TYPE_AFTER_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[[^\]]*\]\([^)]*\)\s*[:-]?\s*(?P<type>[a-zA-Z]+)(?:\([^)]*\))?!?:\s")
        .expect("Invalid regex")
});

/// `type: ` anywhere in the text
static TYPE_ANYWHERE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?P<type>[a-zA-Z]+)(?:\([^)]*\))?!?:\s").expect("Invalid regex")
});

/// How sure the engine is about an assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryConfidence {
    High,
    Medium,
    Low,
}

/// Which signal decided the category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryReason {
    BreakingFlag,
    ConventionalType,
    SectionHint,
    Keywords,
    FallbackHint,
    NoSignal,
}

/// A category decision for one item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inference {
    pub category: CategoryId,
    pub confidence: CategoryConfidence,
    pub reason: CategoryReason,
}

impl Inference {
    fn new(category: CategoryId, confidence: CategoryConfidence, reason: CategoryReason) -> Self {
        Self {
            category,
            confidence,
            reason,
        }
    }
}

/// Category a conventional commit type maps to
pub fn conventional_type_category(commit_type: &str) -> Option<CategoryId> {
    match commit_type.trim().to_lowercase().as_str() {
        "feat" => Some(CategoryId::Features),
        "fix" => Some(CategoryId::Fixes),
        "docs" => Some(CategoryId::Docs),
        "style" => Some(CategoryId::Other),
        "refactor" => Some(CategoryId::Refactor),
        "perf" => Some(CategoryId::Perf),
        "test" => Some(CategoryId::Other),
        "build" => Some(CategoryId::Chore),
        "ci" => Some(CategoryId::Chore),
        "chore" => Some(CategoryId::Chore),
        _ => None,
    }
}

/// Re-derive a mapped conventional type from free text
fn type_from_text(text: &str) -> Option<CategoryId> {
    let text = text.trim();

    for pattern in [&*TYPE_AT_START, &*TYPE_AFTER_LINK] {
        if let Some(id) = pattern
            .captures(text)
            .and_then(|caps| conventional_type_category(&caps["type"]))
        {
            return Some(id);
        }
    }

    TYPE_ANYWHERE
        .captures_iter(text)
        .find_map(|caps| conventional_type_category(&caps["type"]))
}

/// Decide the category for a single item
pub fn infer_item_category(item: &ExtractedItem) -> Inference {
    use CategoryConfidence::*;
    use CategoryReason::*;

    if item.is_breaking() {
        return Inference::new(CategoryId::Breaking, High, BreakingFlag);
    }

    let from_type = item
        .conventional_type
        .as_deref()
        .and_then(conventional_type_category)
        .or_else(|| type_from_text(&item.text));
    if let Some(id) = from_type {
        return Inference::new(id, High, ConventionalType);
    }

    if let Some(hint) = &item.source_hint {
        if hint.has_section() && hint.suggested_category != CategoryId::Other {
            return Inference::new(hint.suggested_category, Medium, SectionHint);
        }
    }

    if let Some((id, _)) = score_keywords(&item.text) {
        return Inference::new(id, Medium, Keywords);
    }

    match &item.source_hint {
        Some(hint) => Inference::new(hint.suggested_category, Low, FallbackHint),
        None => Inference::new(CategoryId::Other, Low, NoSignal),
    }
}

/// Group items into categories, returned in display order.
///
/// Items keep their relative order inside each category. Empty categories
/// are omitted.
pub fn categorize_items(items: Vec<ExtractedItem>) -> Vec<Category> {
    let mut buckets: Vec<Vec<ExtractedItem>> = vec![Vec::new(); CategoryId::ORDER.len()];

    for item in items {
        let inference = infer_item_category(&item);
        trace!(
            text = %item.text,
            category = %inference.category,
            reason = ?inference.reason,
            "categorized item"
        );
        buckets[inference.category.sort_index()].push(item);
    }

    CategoryId::ORDER
        .into_iter()
        .zip(buckets)
        .filter(|(_, items)| !items.is_empty())
        .map(|(id, items)| Category::with_items(id, items))
        .collect()
}

/// Sort categories into display order, folding duplicates of the same id
/// into the first occurrence.
pub fn order_categories(categories: Vec<Category>) -> Vec<Category> {
    let mut merged: Vec<Category> = Vec::with_capacity(categories.len());

    for category in categories {
        match merged.iter_mut().find(|c| c.id == category.id) {
            Some(existing) => existing.items.extend(category.items),
            None => merged.push(category),
        }
    }

    merged.sort_by_key(|c| c.id.sort_index());
    merged
}
