//! Changesets changelogs

use std::sync::LazyLock;

use regex::Regex;
use whatsnew_core::{CategoryId, ExtractedItem};

use super::{build_item, select_block, version_blocks, BlockChoice, Extractor};
use crate::categorize::map_section_to_category;
use crate::detector::format_confidence;
use crate::text::{parse_heading, parse_list_item};
use crate::types::{Extraction, ExtractionMetadata, ReleaseFormat};

static VERSION_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^##\s+(?P<version>v?\d+\.\d+\.\d+\S*)\s*$").expect("Invalid regex")
});

/// `abc1234: ` commit prefix
static SHA_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-f]{7,40}:\s*").expect("Invalid regex"));

/// `[#123](url) [`abc1234`](url) Thanks [@user](url)! - ` preamble
static LINK_PREAMBLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:\[#(?P<pr>\d+)\]\([^)]*\)\s*)?(?:\[`?[0-9a-f]{7,40}`?\]\([^)]*\)\s*)?(?:Thanks\s+(?:\[@[^\]]+\]\([^)]*\)(?:,\s*)?)+!\s*)?-\s+",
    )
    .expect("Invalid regex")
});

pub struct ChangesetsExtractor;

impl ChangesetsExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_block(&self, content: &str) -> Vec<ExtractedItem> {
        let mut entries: Vec<(String, String, Option<String>)> = Vec::new();
        let mut section = String::new();

        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            if let Some((_, title)) = parse_heading(line) {
                section = title.to_string();
                continue;
            }
            let indented = line.starts_with(char::is_whitespace);
            match parse_list_item(line) {
                Some(body) if !indented => {
                    let (text, pr) = strip_preamble(body);
                    entries.push((section.clone(), text, pr));
                }
                _ => {
                    // indented lines and nested bullets belong to the previous entry
                    if let Some((_, text, _)) = entries.last_mut() {
                        let continuation = parse_list_item(line).unwrap_or(line.trim());
                        text.push(' ');
                        text.push_str(continuation);
                    }
                }
            }
        }

        entries
            .into_iter()
            .filter_map(|(section, text, pr)| {
                let mut item = build_item(&text, &section)?;
                if let Some(pr) = pr {
                    item.add_ref(pr);
                }
                if map_section_to_category(&section) == CategoryId::Breaking {
                    item = item.with_breaking(true);
                }
                Some(item)
            })
            .collect()
    }
}

impl Default for ChangesetsExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Remove commit and link prefixes, returning the PR number they named
fn strip_preamble(body: &str) -> (String, Option<String>) {
    if let Some(caps) = LINK_PREAMBLE.captures(body) {
        let pr = caps.name("pr").map(|m| m.as_str().to_string());
        let rest = &body[caps.get(0).map(|m| m.end()).unwrap_or(0)..];
        return (rest.trim().to_string(), pr);
    }
    (SHA_PREFIX.replace(body, "").trim().to_string(), None)
}

impl Extractor for ChangesetsExtractor {
    fn format(&self) -> ReleaseFormat {
        ReleaseFormat::Changesets
    }

    fn extract(&self, raw: &str, target_version: Option<&str>) -> Extraction {
        let mut metadata =
            ExtractionMetadata::new(self.format(), format_confidence(self.format(), raw));

        let blocks = version_blocks(raw, &VERSION_HEADING);
        let items = match select_block(&blocks, target_version, |b| {
            !self.extract_block(&b.content).is_empty()
        }) {
            BlockChoice::Block(block) => {
                metadata.version = Some(block.version.clone());
                metadata.scoped_content = Some(block.content.clone());
                self.extract_block(&block.content)
            }
            BlockChoice::MissingTarget => Vec::new(),
            BlockChoice::Whole => self.extract_block(raw),
        };

        Extraction { items, metadata }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHANGELOG: &str = "\
# @scope/pkg

## 2.0.0

### Major Changes

- abc1234: Drop support for node 14

### Minor Changes

- [#123](https://github.com/o/r/pull/123) [`def5678`](https://github.com/o/r/commit/def5678) Thanks [@alice](https://github.com/alice)! - Add a streaming API
  that works with large inputs

### Patch Changes

- Updated dependencies
  - other-pkg@1.0.1

## 1.0.0

### Patch Changes

- 1111abc: Fix crash on empty config
";

    #[test]
    fn test_extract_latest_block() {
        let extraction = ChangesetsExtractor::new().extract(CHANGELOG, None);
        assert_eq!(extraction.metadata.version.as_deref(), Some("2.0.0"));
        assert_eq!(extraction.items.len(), 3);

        let major = &extraction.items[0];
        assert_eq!(major.text, "Drop support for node 14");
        assert!(major.is_breaking());

        let minor = &extraction.items[1];
        assert_eq!(minor.text, "Add a streaming API that works with large inputs");
        assert_eq!(minor.refs, vec!["123"]);
        assert_eq!(
            minor.source_hint.as_ref().unwrap().suggested_category,
            CategoryId::Features
        );

        assert_eq!(
            extraction.items[2].text,
            "Updated dependencies other-pkg@1.0.1"
        );
    }

    #[test]
    fn test_extract_target_block() {
        let extraction = ChangesetsExtractor::new().extract(CHANGELOG, Some("1.0.0"));
        assert_eq!(extraction.items.len(), 1);
        assert_eq!(extraction.items[0].text, "Fix crash on empty config");
        assert_eq!(
            extraction.items[0].source_hint.as_ref().unwrap().suggested_category,
            CategoryId::Fixes
        );
    }
}
