//! Core types shared by extraction, categorization and the pipeline

use serde::{Deserialize, Serialize};

/// Category identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryId {
    /// Breaking changes
    Breaking,
    /// New features
    Features,
    /// Bug fixes
    Fixes,
    /// Security fixes and advisories
    Security,
    /// Performance improvements
    Perf,
    /// Dependency updates
    Deps,
    /// Documentation
    Docs,
    /// Refactoring
    Refactor,
    /// Maintenance, build and CI
    Chore,
    /// Anything else
    Other,
}

impl CategoryId {
    /// Display and sort order used whenever categories are assembled
    pub const ORDER: [CategoryId; 10] = [
        CategoryId::Breaking,
        CategoryId::Security,
        CategoryId::Features,
        CategoryId::Fixes,
        CategoryId::Perf,
        CategoryId::Deps,
        CategoryId::Refactor,
        CategoryId::Docs,
        CategoryId::Chore,
        CategoryId::Other,
    ];

    /// Stable identifier string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Breaking => "breaking",
            Self::Features => "features",
            Self::Fixes => "fixes",
            Self::Security => "security",
            Self::Perf => "perf",
            Self::Deps => "deps",
            Self::Docs => "docs",
            Self::Refactor => "refactor",
            Self::Chore => "chore",
            Self::Other => "other",
        }
    }

    /// Default human readable title
    pub fn title(&self) -> &'static str {
        match self {
            Self::Breaking => "Breaking Changes",
            Self::Features => "Features",
            Self::Fixes => "Bug Fixes",
            Self::Security => "Security",
            Self::Perf => "Performance",
            Self::Deps => "Dependencies",
            Self::Docs => "Documentation",
            Self::Refactor => "Refactoring",
            Self::Chore => "Chores",
            Self::Other => "Other Changes",
        }
    }

    /// Position of this category in [`CategoryId::ORDER`]
    pub fn sort_index(&self) -> usize {
        Self::ORDER
            .iter()
            .position(|id| id == self)
            .unwrap_or(Self::ORDER.len())
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CategoryId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breaking" => Ok(Self::Breaking),
            "features" | "feature" => Ok(Self::Features),
            "fixes" | "fix" => Ok(Self::Fixes),
            "security" => Ok(Self::Security),
            "perf" | "performance" => Ok(Self::Perf),
            "deps" | "dependencies" => Ok(Self::Deps),
            "docs" | "documentation" => Ok(Self::Docs),
            "refactor" => Ok(Self::Refactor),
            "chore" | "chores" => Ok(Self::Chore),
            "other" => Ok(Self::Other),
            _ => Err(()),
        }
    }
}

/// Section information an extractor recorded for an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceHint {
    /// Literal section title the item appeared under (empty when none)
    pub section: String,
    /// Best-guess category for that section
    pub suggested_category: CategoryId,
}

impl SourceHint {
    /// Create a new hint
    pub fn new(section: impl Into<String>, suggested_category: CategoryId) -> Self {
        Self {
            section: section.into(),
            suggested_category,
        }
    }

    /// Whether a section title was recorded
    pub fn has_section(&self) -> bool {
        !self.section.trim().is_empty()
    }
}

/// One raw change entry before categorization
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedItem {
    /// Change description
    pub text: String,
    /// Issue / pull request references, ordered and deduplicated
    #[serde(default)]
    pub refs: Vec<String>,
    /// Pre-computed quality score in [0, 1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Conventional commit type (feat, fix, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conventional_type: Option<String>,
    /// Conventional commit scope
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Explicit breaking change flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breaking: Option<bool>,
    /// Section the item was found under
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_hint: Option<SourceHint>,
}

impl ExtractedItem {
    /// Create an item with the given text
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Add a reference, ignoring duplicates
    pub fn add_ref(&mut self, reference: impl Into<String>) {
        let reference = reference.into();
        if !reference.is_empty() && !self.refs.contains(&reference) {
            self.refs.push(reference);
        }
    }

    /// Add several references, ignoring duplicates
    pub fn extend_refs<I, S>(&mut self, references: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for reference in references {
            self.add_ref(reference);
        }
    }

    /// Set references
    pub fn with_refs<I, S>(mut self, references: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extend_refs(references);
        self
    }

    /// Set the score
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score.clamp(0.0, 1.0));
        self
    }

    /// Set the conventional commit type
    pub fn with_conventional_type(mut self, commit_type: impl Into<String>) -> Self {
        self.conventional_type = Some(commit_type.into());
        self
    }

    /// Set the scope
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Set the breaking flag
    pub fn with_breaking(mut self, breaking: bool) -> Self {
        self.breaking = Some(breaking);
        self
    }

    /// Set the source hint
    pub fn with_source_hint(mut self, hint: SourceHint) -> Self {
        self.source_hint = Some(hint);
        self
    }

    /// Whether the item is explicitly flagged as breaking
    pub fn is_breaking(&self) -> bool {
        self.breaking == Some(true)
    }
}

/// A labeled group of items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Category identifier
    pub id: CategoryId,
    /// Display title
    pub title: String,
    /// Items in this category
    pub items: Vec<ExtractedItem>,
}

impl Category {
    /// Create an empty category with its default title
    pub fn new(id: CategoryId) -> Self {
        Self {
            id,
            title: id.title().to_string(),
            items: Vec::new(),
        }
    }

    /// Create a category holding the given items
    pub fn with_items(id: CategoryId, items: Vec<ExtractedItem>) -> Self {
        Self {
            id,
            title: id.title().to_string(),
            items,
        }
    }

    /// Check if category is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Metadata attached to a source result
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMetadata {
    /// Raw text the result was extracted from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<String>,
    /// Version the result describes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Release date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Tag the result describes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Comparison URL between the previous and current release
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_url: Option<String>,
    /// Number of commits inspected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_count: Option<usize>,
}

impl SourceMetadata {
    /// Length in bytes of the raw content, 0 when absent
    pub fn raw_content_len(&self) -> usize {
        self.raw_content.as_deref().map(str::len).unwrap_or(0)
    }
}

/// Output of one data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceResult {
    /// Categorized items
    pub categories: Vec<Category>,
    /// Dialect detection certainty in [0, 1]
    pub confidence: f64,
    /// Name of the source that produced this result
    pub source: String,
    /// Metadata
    #[serde(default)]
    pub metadata: SourceMetadata,
}

impl SourceResult {
    /// Create a new result
    pub fn new(source: impl Into<String>, categories: Vec<Category>, confidence: f64) -> Self {
        Self {
            categories,
            confidence: confidence.clamp(0.0, 1.0),
            source: source.into(),
            metadata: SourceMetadata::default(),
        }
    }

    /// Set metadata
    pub fn with_metadata(mut self, metadata: SourceMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Total number of items across all categories
    pub fn total_items(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }

    /// Iterate over every item
    pub fn items(&self) -> impl Iterator<Item = &ExtractedItem> {
        self.categories.iter().flat_map(|c| c.items.iter())
    }

    /// Find a category by id
    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Whether any category holds a breaking change
    pub fn has_breaking_changes(&self) -> bool {
        self.category(CategoryId::Breaking)
            .is_some_and(|c| !c.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_order() {
        assert_eq!(CategoryId::Breaking.sort_index(), 0);
        assert_eq!(CategoryId::Security.sort_index(), 1);
        assert_eq!(CategoryId::Other.sort_index(), 9);
        assert!(CategoryId::Docs.sort_index() > CategoryId::Refactor.sort_index());
    }

    #[test]
    fn test_category_id_from_str() {
        assert_eq!("features".parse::<CategoryId>(), Ok(CategoryId::Features));
        assert_eq!("Fix".parse::<CategoryId>(), Ok(CategoryId::Fixes));
        assert!("unknown".parse::<CategoryId>().is_err());
    }

    #[test]
    fn test_refs_are_deduplicated() {
        let mut item = ExtractedItem::new("add endpoint");
        item.add_ref("12");
        item.add_ref("12");
        item.extend_refs(["13", "12"]);

        assert_eq!(item.refs, vec!["12", "13"]);
    }

    #[test]
    fn test_score_is_clamped() {
        let item = ExtractedItem::new("x").with_score(1.7);
        assert_eq!(item.score, Some(1.0));
    }

    #[test]
    fn test_source_result_totals() {
        let result = SourceResult::new(
            "release",
            vec![
                Category::with_items(
                    CategoryId::Features,
                    vec![ExtractedItem::new("a"), ExtractedItem::new("b")],
                ),
                Category::with_items(CategoryId::Breaking, vec![ExtractedItem::new("c")]),
            ],
            0.9,
        );

        assert_eq!(result.total_items(), 3);
        assert!(result.has_breaking_changes());
        assert_eq!(result.items().count(), 3);
    }

    #[test]
    fn test_serialized_item_uses_camel_case() {
        let item = ExtractedItem::new("add endpoint")
            .with_conventional_type("feat")
            .with_source_hint(SourceHint::new("Features", CategoryId::Features));
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["conventionalType"], "feat");
        assert_eq!(json["sourceHint"]["suggestedCategory"], "features");
        assert!(json.get("score").is_none());
    }
}
