//! Per-dialect item extractors
//!
//! Every extractor turns raw release text into uncategorized
//! [`ExtractedItem`]s. The helpers in this module hold the rules all
//! dialects share: reference hygiene, scope normalization, item validation
//! and section hints.

mod changesets;
mod conventional;
mod generic;
mod github_auto;
mod gitlab;
mod keep_a_changelog;
mod registry;

pub use changesets::ChangesetsExtractor;
pub use conventional::{extract_commit_message, ConventionalExtractor};
pub use generic::GenericExtractor;
pub use github_auto::GithubAutoExtractor;
pub use gitlab::GitlabExtractor;
pub use keep_a_changelog::KeepAChangelogExtractor;
pub use registry::ExtractorRegistry;

use regex::Regex;
use tracing::trace;
use whatsnew_core::{ExtractedItem, SourceHint};

use crate::categorize::map_section_to_category;
use crate::text::{
    apply_reference_hygiene, is_valid_item_text, parse_conventional, parse_heading,
    parse_list_item, ConventionalLine,
};
use crate::types::{Extraction, ReleaseFormat};

/// Trait for dialect extractors
pub trait Extractor: Send + Sync {
    /// Dialect this extractor handles
    fn format(&self) -> ReleaseFormat;

    /// Pull raw change items out of release text.
    ///
    /// Dialects with version blocks restrict themselves to `target_version`
    /// when it is given and present.
    fn extract(&self, raw: &str, target_version: Option<&str>) -> Extraction;
}

/// Build an item from a conventional commit line
pub(crate) fn conventional_item(parsed: ConventionalLine) -> Option<ExtractedItem> {
    let (text, refs) = apply_reference_hygiene(&parsed.subject);
    if !is_valid_item_text(&text) {
        trace!(text = %text, "dropping invalid conventional item");
        return None;
    }

    let mut item = ExtractedItem::new(text)
        .with_refs(refs)
        .with_conventional_type(parsed.commit_type);
    if let Some(scope) = parsed.scope {
        item = item.with_scope(scope);
    }
    if parsed.breaking {
        item = item.with_breaking(true);
    }
    Some(item)
}

/// Build an item from a line of text found under `section`.
///
/// Conventional lines keep their commit signals; anything else carries a
/// hint naming the section it came from.
pub(crate) fn build_item(text: &str, section: &str) -> Option<ExtractedItem> {
    if let Some(parsed) = parse_conventional(text) {
        return conventional_item(parsed);
    }

    let (cleaned, refs) = apply_reference_hygiene(text);
    if !is_valid_item_text(&cleaned) {
        trace!(text = %cleaned, "dropping invalid item");
        return None;
    }

    Some(
        ExtractedItem::new(cleaned)
            .with_refs(refs)
            .with_source_hint(SourceHint::new(section, map_section_to_category(section))),
    )
}

/// A list item and the heading it appeared under
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SectionEntry {
    pub section: String,
    pub text: String,
}

/// Collect list items with their nearest heading.
///
/// Indented lines that are neither list items nor headings continue the
/// previous item.
pub(crate) fn section_list_items(text: &str) -> Vec<SectionEntry> {
    let mut entries: Vec<SectionEntry> = Vec::new();
    let mut section = String::new();
    let mut continuing = false;

    for line in text.lines() {
        if line.trim().is_empty() {
            continuing = false;
            continue;
        }
        if let Some((_, title)) = parse_heading(line) {
            section = title.to_string();
            continuing = false;
            continue;
        }
        if let Some(content) = parse_list_item(line) {
            entries.push(SectionEntry {
                section: section.clone(),
                text: content.to_string(),
            });
            continuing = true;
            continue;
        }
        if continuing && line.starts_with(char::is_whitespace) {
            if let Some(last) = entries.last_mut() {
                last.text.push(' ');
                last.text.push_str(line.trim());
            }
        }
    }

    entries
}

/// One `## version` block of a multi-release document
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct VersionBlock {
    pub version: String,
    pub date: Option<String>,
    pub content: String,
}

/// Split a document into version blocks.
///
/// `heading` must capture `version` and may capture `date`. Text before
/// the first version heading is not part of any block.
pub(crate) fn version_blocks(text: &str, heading: &Regex) -> Vec<VersionBlock> {
    let mut blocks: Vec<VersionBlock> = Vec::new();

    for line in text.lines() {
        if let Some(caps) = heading.captures(line) {
            if let Some(version) = caps.name("version") {
                blocks.push(VersionBlock {
                    version: version.as_str().trim().to_string(),
                    date: caps.name("date").map(|d| d.as_str().trim().to_string()),
                    content: String::new(),
                });
                continue;
            }
        }
        if let Some(block) = blocks.last_mut() {
            block.content.push_str(line);
            block.content.push('\n');
        }
    }

    blocks
}

/// Whether a block's version names the same release as `target`
pub(crate) fn version_matches(version: &str, target: &str) -> bool {
    let strip = |v: &str| v.trim().trim_start_matches(['v', 'V']).to_string();
    strip(version).eq_ignore_ascii_case(&strip(target))
}

/// Which part of a versioned document to extract from
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum BlockChoice<'a> {
    /// A single version block
    Block(&'a VersionBlock),
    /// A target version was asked for and the document does not have it
    MissingTarget,
    /// The whole document, when it has no version headings (or none with items)
    Whole,
}

/// Pick the block for `target`, else the first block `has_items` accepts.
///
/// A target that is absent from a versioned document selects nothing.
pub(crate) fn select_block<'a>(
    blocks: &'a [VersionBlock],
    target: Option<&str>,
    has_items: impl Fn(&VersionBlock) -> bool,
) -> BlockChoice<'a> {
    if let Some(target) = target {
        if let Some(block) = blocks.iter().find(|b| version_matches(&b.version, target)) {
            return BlockChoice::Block(block);
        }
        if !blocks.is_empty() {
            trace!(target, "target version not found");
            return BlockChoice::MissingTarget;
        }
        return BlockChoice::Whole;
    }
    blocks
        .iter()
        .find(|b| has_items(b))
        .map_or(BlockChoice::Whole, BlockChoice::Block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use whatsnew_core::CategoryId;

    #[test]
    fn test_build_item_conventional() {
        let item = build_item("feat(  www ): minor updates (#5749)", "").unwrap();
        assert_eq!(item.text, "minor updates");
        assert_eq!(item.scope.as_deref(), Some("www"));
        assert_eq!(item.conventional_type.as_deref(), Some("feat"));
        assert_eq!(item.refs, vec!["5749"]);
        assert!(item.source_hint.is_none());
    }

    #[test]
    fn test_build_item_hinted() {
        let item = build_item("Handle empty input (#3)", "🐛 Bug Fixes").unwrap();
        assert_eq!(item.text, "Handle empty input");
        let hint = item.source_hint.unwrap();
        assert_eq!(hint.section, "🐛 Bug Fixes");
        assert_eq!(hint.suggested_category, CategoryId::Fixes);
    }

    #[test]
    fn test_build_item_rejects_noise() {
        assert!(build_item("(#12)", "Fixes").is_none());
        assert!(build_item("ok", "Fixes").is_none());
    }

    #[test]
    fn test_section_list_items_with_continuation() {
        let text = "### Fixed\n\n- first line\n  continues here\n- second\n\n### Added\n* third\n";
        let entries = section_list_items(text);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].text, "first line continues here");
        assert_eq!(entries[0].section, "Fixed");
        assert_eq!(entries[2].section, "Added");
    }

    #[test]
    fn test_version_selection() {
        let heading = Regex::new(r"^##\s+(?P<version>v?\d+\.\d+\.\d+)\s*$").unwrap();
        let text = "## 2.0.0\n\n## 1.1.0\n- a change\n## 1.0.0\n- old\n";
        let blocks = version_blocks(text, &heading);
        assert_eq!(blocks.len(), 3);

        let BlockChoice::Block(picked) = select_block(&blocks, Some("v1.0.0"), |_| true) else {
            panic!("expected the 1.0.0 block");
        };
        assert_eq!(picked.version, "1.0.0");

        let BlockChoice::Block(first_populated) =
            select_block(&blocks, None, |b| !section_list_items(&b.content).is_empty())
        else {
            panic!("expected a populated block");
        };
        assert_eq!(first_populated.version, "1.1.0");
    }

    #[test]
    fn test_missing_target_selects_nothing() {
        let heading = Regex::new(r"^##\s+(?P<version>v?\d+\.\d+\.\d+)\s*$").unwrap();
        let text = "## 2.0.0\n- new\n## 1.0.0\n- old\n";
        let blocks = version_blocks(text, &heading);

        assert_eq!(
            select_block(&blocks, Some("1.5.0"), |_| true),
            BlockChoice::MissingTarget
        );
        // unversioned text is extracted whole
        assert_eq!(select_block(&[], Some("1.5.0"), |_| true), BlockChoice::Whole);
    }
}
