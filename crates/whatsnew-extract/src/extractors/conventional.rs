//! Conventional Commits text
//!
//! Handles both lists of conventional lines (release bodies built from
//! commit subjects) and individual commit messages with footers.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;
use whatsnew_core::ExtractedItem;

use super::{build_item, conventional_item, Extractor};
use crate::detector::format_confidence;
use crate::text::{
    apply_reference_hygiene, is_valid_item_text, parse_conventional, parse_heading,
    parse_list_item, strip_list_marker,
};
use crate::types::{Extraction, ExtractionMetadata, ReleaseFormat};

/// `BREAKING CHANGE: ...` / `BREAKING-CHANGE: ...` footer
static BREAKING_FOOTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^BREAKING[ -]CHANGE:\s*(?P<text>.*)$").expect("Invalid regex")
});

/// Merge commit subjects
static MERGE_SUBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Merge (?:pull request|branch|remote-tracking branch|tag) ")
        .expect("Invalid regex")
});

pub struct ConventionalExtractor;

impl ConventionalExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConventionalExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Accumulates a breaking change footer across lines
#[derive(Default)]
struct BreakingCapture {
    text: Option<String>,
}

impl BreakingCapture {
    fn open(&mut self, first: &str, items: &mut Vec<ExtractedItem>) {
        self.close(items);
        self.text = Some(first.trim().to_string());
    }

    fn is_open(&self) -> bool {
        self.text.is_some()
    }

    fn append(&mut self, line: &str) {
        if let Some(text) = self.text.as_mut() {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(line.trim());
        }
    }

    fn close(&mut self, items: &mut Vec<ExtractedItem>) {
        let Some(text) = self.text.take() else {
            return;
        };
        let (cleaned, refs) = apply_reference_hygiene(&text);
        if is_valid_item_text(&cleaned) {
            items.push(
                ExtractedItem::new(cleaned)
                    .with_refs(refs)
                    .with_conventional_type("breaking")
                    .with_breaking(true),
            );
        } else {
            trace!(text = %cleaned, "dropping empty breaking change footer");
        }
    }
}

impl Extractor for ConventionalExtractor {
    fn format(&self) -> ReleaseFormat {
        ReleaseFormat::ConventionalCommits
    }

    fn extract(&self, raw: &str, _target_version: Option<&str>) -> Extraction {
        let metadata =
            ExtractionMetadata::new(self.format(), format_confidence(self.format(), raw));
        let mut items = Vec::new();
        let mut breaking = BreakingCapture::default();
        let mut section = String::new();

        for line in raw.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                breaking.close(&mut items);
                continue;
            }
            if let Some((_, title)) = parse_heading(trimmed) {
                breaking.close(&mut items);
                section = title.to_string();
                continue;
            }

            let content = strip_list_marker(trimmed);
            if let Some(caps) = BREAKING_FOOTER.captures(content) {
                breaking.open(&caps["text"], &mut items);
                continue;
            }
            if let Some(parsed) = parse_conventional(content) {
                breaking.close(&mut items);
                items.extend(conventional_item(parsed));
                continue;
            }
            if breaking.is_open() {
                breaking.append(content);
                continue;
            }
            if parse_list_item(trimmed).is_some() {
                items.extend(build_item(content, &section));
            }
        }
        breaking.close(&mut items);

        Extraction { items, metadata }
    }
}

/// Extract items from one commit message.
///
/// The subject becomes an item and every breaking change footer in the
/// body becomes another. Merge commits yield nothing.
pub fn extract_commit_message(message: &str) -> Vec<ExtractedItem> {
    let mut lines = message.lines();
    let Some(subject) = lines.next().map(str::trim) else {
        return Vec::new();
    };
    if subject.is_empty() || MERGE_SUBJECT.is_match(subject) {
        return Vec::new();
    }

    // plain subjects carry an empty section hint
    let mut items: Vec<ExtractedItem> = build_item(subject, "").into_iter().collect();

    let mut breaking = BreakingCapture::default();
    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() || parse_conventional(trimmed).is_some() {
            breaking.close(&mut items);
            continue;
        }
        if let Some(caps) = BREAKING_FOOTER.captures(trimmed) {
            breaking.open(&caps["text"], &mut items);
        } else if breaking.is_open() {
            breaking.append(trimmed);
        }
    }
    breaking.close(&mut items);

    items
}
