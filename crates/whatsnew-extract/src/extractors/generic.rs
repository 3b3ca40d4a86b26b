//! Free-form release notes

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use super::{build_item, section_list_items, Extractor};
use crate::detector::format_confidence;
use crate::text::{parse_heading, parse_list_item};
use crate::types::{Extraction, ExtractionMetadata, ReleaseFormat};

/// Headings whose sections only list people
static CONTRIBUTOR_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:contributors?|thanks|thank you|acknowledge?ments?|credits)\b")
        .expect("Invalid regex")
});

/// `Jane Doe (@jane)`
static NAME_WITH_HANDLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{L}][\p{L} .'-]*\s*\(@[\w-]+\)[.!]?$").expect("Invalid regex")
});

/// `@jane`, `@jane, @john`
static BARE_HANDLES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@[\w-]+(?:\[bot\])?(?:\s*(?:,|and)?\s*@[\w-]+(?:\[bot\])?)*[.!]?$")
        .expect("Invalid regex")
});

/// `Thanks to @jane ...`
static THANKS_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:many\s+)?thanks?(?:\s+you)?\s+(?:to\s+)?@").expect("Invalid regex"));

/// Shortest prose line accepted as an item when the text has no lists
const MIN_PROSE_ITEM_LEN: usize = 10;

pub struct GenericExtractor;

impl GenericExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GenericExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a line only credits people
pub(crate) fn is_contributor_noise(text: &str) -> bool {
    let text = text.trim();
    NAME_WITH_HANDLE.is_match(text) || BARE_HANDLES.is_match(text) || THANKS_LINE.is_match(text)
}

fn is_contributor_section(section: &str) -> bool {
    CONTRIBUTOR_HEADING.is_match(section)
}

/// First prose paragraph, when it comes before any heading or list
fn lead_summary(raw: &str) -> Option<String> {
    let mut paragraph: Vec<&str> = Vec::new();

    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if paragraph.is_empty() {
                continue;
            }
            break;
        }
        if parse_heading(trimmed).is_some() || parse_list_item(trimmed).is_some() {
            break;
        }
        paragraph.push(trimmed);
    }

    if paragraph.is_empty() {
        None
    } else {
        Some(paragraph.join(" "))
    }
}

impl Extractor for GenericExtractor {
    fn format(&self) -> ReleaseFormat {
        ReleaseFormat::Generic
    }

    fn extract(&self, raw: &str, _target_version: Option<&str>) -> Extraction {
        let mut metadata =
            ExtractionMetadata::new(self.format(), format_confidence(self.format(), raw));
        metadata.summary = lead_summary(raw);

        let entries = section_list_items(raw);
        let items = if entries.is_empty() {
            let mut section = String::new();
            let mut items = Vec::new();
            for line in raw.lines() {
                let trimmed = line.trim();
                if let Some((_, title)) = parse_heading(trimmed) {
                    section = title.to_string();
                    continue;
                }
                if trimmed.chars().count() < MIN_PROSE_ITEM_LEN
                    || is_contributor_section(&section)
                    || is_contributor_noise(trimmed)
                {
                    continue;
                }
                items.extend(build_item(trimmed, &section));
            }
            items
        } else {
            entries
                .into_iter()
                .filter(|entry| {
                    let noise =
                        is_contributor_section(&entry.section) || is_contributor_noise(&entry.text);
                    if noise {
                        trace!(text = %entry.text, "dropping contributor line");
                    }
                    !noise
                })
                .filter_map(|entry| build_item(&entry.text, &entry.section))
                .collect()
        };

        Extraction { items, metadata }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use whatsnew_core::CategoryId;

    #[test]
    fn test_list_items_with_sections() {
        let raw = "This release improves startup.\n\n## 🚀 Features\n- Add dark mode (#12)\n\n## Bug fixes\n- Handle empty config\n";
        let extraction = GenericExtractor::new().extract(raw, None);

        assert_eq!(
            extraction.metadata.summary.as_deref(),
            Some("This release improves startup.")
        );
        assert_eq!(extraction.metadata.format_confidence, 0.9);
        assert_eq!(extraction.items.len(), 2);
        assert_eq!(extraction.items[0].text, "Add dark mode");
        assert_eq!(extraction.items[0].refs, vec!["12"]);
        assert_eq!(
            extraction.items[1].source_hint.as_ref().unwrap().suggested_category,
            CategoryId::Fixes
        );
    }

    #[test]
    fn test_contributor_noise_is_dropped() {
        let raw = "## Changes\n- Faster builds\n- Jane Doe (@jane)\n- @bob, @carol\n- Thanks to @dave for the report\n\n## Contributors\n- Everyone who helped out\n";
        let extraction = GenericExtractor::new().extract(raw, None);
        let texts: Vec<&str> = extraction.items.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(texts, vec!["Faster builds"]);
    }

    #[test]
    fn test_prose_lines_without_lists() {
        let raw = "We rewrote the scheduler to cut latency.\nShort.\nThe CLI now prints colored output.";
        let extraction = GenericExtractor::new().extract(raw, None);
        assert_eq!(extraction.items.len(), 2);
        assert!(extraction.items[0].source_hint.as_ref().unwrap().section.is_empty());
    }

    #[test]
    fn test_no_summary_when_text_starts_with_heading() {
        let raw = "## Notes\n\nSome paragraph here.\n";
        let extraction = GenericExtractor::new().extract(raw, None);
        assert!(extraction.metadata.summary.is_none());
    }
}
