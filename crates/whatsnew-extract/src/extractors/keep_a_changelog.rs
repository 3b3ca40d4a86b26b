//! Keep a Changelog documents

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use whatsnew_core::ExtractedItem;

use super::{
    build_item, section_list_items, select_block, version_blocks, BlockChoice, Extractor,
};
use crate::detector::format_confidence;
use crate::types::{Extraction, ExtractionMetadata, ReleaseFormat};

/// `## [1.2.0] - 2024-01-01`, `## [Unreleased]`, `## 1.2.0 - 2024-01-01`
static VERSION_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^##\s+\[?(?P<version>v?\d+\.\d+\.\d+[^\]\s]*|unreleased)\]?(?:\s+-\s+(?P<date>\d{4}-\d{2}-\d{2}))?",
    )
    .expect("Invalid regex")
});

pub struct KeepAChangelogExtractor;

impl KeepAChangelogExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_block(&self, content: &str) -> Vec<ExtractedItem> {
        section_list_items(content)
            .into_iter()
            .filter_map(|entry| build_item(&entry.text, &entry.section))
            .collect()
    }
}

impl Default for KeepAChangelogExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for KeepAChangelogExtractor {
    fn format(&self) -> ReleaseFormat {
        ReleaseFormat::KeepAChangelog
    }

    fn extract(&self, raw: &str, target_version: Option<&str>) -> Extraction {
        let mut metadata =
            ExtractionMetadata::new(self.format(), format_confidence(self.format(), raw));

        let blocks = version_blocks(raw, &VERSION_HEADING);
        let items = match select_block(&blocks, target_version, |b| {
            !self.extract_block(&b.content).is_empty()
        }) {
            BlockChoice::Block(block) => {
                debug!(version = %block.version, "selected changelog block");
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
