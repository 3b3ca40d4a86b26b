//! Merging commit history into the primary result

use std::collections::HashSet;

use tracing::debug;
use whatsnew_core::{Category, SourceResult};
use whatsnew_extract::order_categories;
use whatsnew_extract::text::normalize_text;

/// Merge the commit result into the primary result.
///
/// A commit item is only added when none of its references and not its
/// normalized text already appear in the primary result (or in a commit
/// item admitted before it). With one side missing, the other side is
/// returned as is.
pub fn merge_results(
    primary: Option<SourceResult>,
    commits: Option<SourceResult>,
) -> Option<SourceResult> {
    let (mut merged, commits) = match (primary, commits) {
        (Some(primary), Some(commits)) => (primary, commits),
        (primary, commits) => return primary.or(commits),
    };

    let mut seen_refs: HashSet<String> = merged
        .items()
        .flat_map(|item| item.refs.iter().cloned())
        .collect();
    let mut seen_texts: HashSet<String> =
        merged.items().map(|item| normalize_text(&item.text)).collect();

    let mut additions: Vec<Category> = Vec::new();
    let mut skipped = 0usize;

    for category in commits.categories {
        let mut admitted = Vec::new();
        for item in category.items {
            let text = normalize_text(&item.text);
            if item.refs.iter().any(|r| seen_refs.contains(r)) || seen_texts.contains(&text) {
                skipped += 1;
                continue;
            }
            seen_refs.extend(item.refs.iter().cloned());
            seen_texts.insert(text);
            admitted.push(item);
        }
        if !admitted.is_empty() {
            additions.push(Category::with_items(category.id, admitted));
        }
    }

    let added: usize = additions.iter().map(|c| c.items.len()).sum();
    debug!(added, skipped, "merged commit history");

    let mut categories = std::mem::take(&mut merged.categories);
    categories.extend(additions);
    merged.categories = order_categories(categories);
    merged.confidence = merged.confidence.max(commits.confidence);

    if merged.metadata.commit_count.is_none() {
        merged.metadata.commit_count = commits.metadata.commit_count;
    }
    if merged.metadata.compare_url.is_none() {
        merged.metadata.compare_url = commits.metadata.compare_url;
    }

    Some(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use whatsnew_core::{CategoryId, ExtractedItem, SourceMetadata};

    fn result(source: &str, confidence: f64, categories: Vec<Category>) -> SourceResult {
        SourceResult::new(source, categories, confidence)
    }

    #[test]
    fn test_one_side_passes_through() {
        let primary = result("release", 0.9, Vec::new());
        assert_eq!(
            merge_results(Some(primary.clone()), None),
            Some(primary.clone())
        );
        assert_eq!(merge_results(None, Some(primary.clone())), Some(primary));
        assert_eq!(merge_results(None, None), None);
    }

    #[test]
    fn test_commit_duplicates_are_skipped() {
        let primary = result(
            "release",
            0.7,
            vec![Category::with_items(
                CategoryId::Features,
                vec![
                    ExtractedItem::new("Add CSV export").with_refs(["12"]),
                    ExtractedItem::new("Dark mode"),
                ],
            )],
        );
        let commits = result(
            "commits",
            0.85,
            vec![
                Category::with_items(
                    CategoryId::Features,
                    vec![
                        // same PR as the release entry
                        ExtractedItem::new("add csv exporter").with_refs(["12"]),
                        // same text once normalized
                        ExtractedItem::new("dark mode (#40)").with_refs(["40"]),
                    ],
                ),
                Category::with_items(
                    CategoryId::Fixes,
                    vec![
                        ExtractedItem::new("Handle empty input").with_refs(["13"]),
                        ExtractedItem::new("handle empty input"),
                    ],
                ),
            ],
        )
        .with_metadata(SourceMetadata {
            commit_count: Some(4),
            ..Default::default()
        });

        let merged = merge_results(Some(primary), Some(commits)).unwrap();

        assert_eq!(merged.source, "release");
        assert_eq!(merged.confidence, 0.85);
        assert_eq!(merged.metadata.commit_count, Some(4));
        assert_eq!(merged.category(CategoryId::Features).unwrap().items.len(), 2);
        let fixes = merged.category(CategoryId::Fixes).unwrap();
        assert_eq!(fixes.items.len(), 1);
        assert_eq!(fixes.items[0].refs, vec!["13"]);
        assert_eq!(merged.categories[0].id, CategoryId::Features);
        assert_eq!(merged.categories[1].id, CategoryId::Fixes);
    }
}
