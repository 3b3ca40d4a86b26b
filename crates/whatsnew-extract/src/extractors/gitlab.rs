//! GitLab generated changelogs

use std::sync::LazyLock;

use regex::Regex;

use super::{
    build_item, section_list_items, select_block, version_blocks, BlockChoice, Extractor,
};
use crate::detector::format_confidence;
use crate::types::{Extraction, ExtractionMetadata, ReleaseFormat};

/// `## 1.2.0 (2024-01-01)`
static VERSION_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^##\s+(?P<version>v?\d+\.\d+\.\d+\S*)(?:\s+\((?P<date>[^)]+)\))?\s*$")
        .expect("Invalid regex")
});

/// `[title](group/project@sha)` at the start of an entry
static LINKED_COMMIT_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(?P<title>[^\]]+)\]\([^)]*@[0-9a-f]{7,40}\)").expect("Invalid regex")
});

/// `([merge request](group/project!123))`
static MERGE_REQUEST_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*\(\[merge request\]\([^)]*\)\)").expect("Invalid regex")
});

/// ` by @user` attribution
static AUTHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+by\s+@[\w.-]+").expect("Invalid regex"));

static MERGE_REQUEST_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!(\d+)\b").expect("Invalid regex"));

pub struct GitlabExtractor;

impl GitlabExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_block(&self, content: &str) -> Vec<whatsnew_core::ExtractedItem> {
        section_list_items(content)
            .into_iter()
            .filter_map(|entry| {
                let merge_requests: Vec<String> = MERGE_REQUEST_REF
                    .captures_iter(&entry.text)
                    .map(|caps| format!("!{}", &caps[1]))
                    .collect();

                let text = match LINKED_COMMIT_TITLE.captures(&entry.text) {
                    Some(caps) => {
                        let end = caps.get(0).map(|m| m.end()).unwrap_or(0);
                        format!("{}{}", &caps["title"], &entry.text[end..])
                    }
                    None => entry.text.clone(),
                };
                let text = MERGE_REQUEST_LINK.replace_all(&text, "");
                let text = AUTHOR.replace_all(&text, "");

                let mut item = build_item(text.trim(), &entry.section)?;
                item.extend_refs(merge_requests);
                Some(item)
            })
            .collect()
    }
}

impl Default for GitlabExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for GitlabExtractor {
    fn format(&self) -> ReleaseFormat {
        ReleaseFormat::Gitlab
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
                metadata.date = block.date.clone();
                metadata.scoped_content = Some(block.content.clone());
                self.extract_block(&block.content)
            }
            BlockChoice::MissingTarget => Vec::new(),
            BlockChoice::Whole => self.extract_block(raw),
        };

        Extraction { items, metadata }
    }
}
