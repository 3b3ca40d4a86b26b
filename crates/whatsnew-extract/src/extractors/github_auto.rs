//! GitHub auto-generated release notes

use std::sync::LazyLock;

use regex::Regex;

use super::{build_item, section_list_items, Extractor};
use crate::detector::format_confidence;
use crate::types::{Extraction, ExtractionMetadata, ReleaseFormat};

/// `title by @user in https://github.com/o/r/pull/N`
static ATTRIBUTED_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<title>.+?)\s+by\s+@[\w-]+(?:\[bot\])?\s+in\s+(?:https?://\S+/pull/(?P<url_number>\d+)|#(?P<number>\d+))\s*$",
    )
    .expect("Invalid regex")
});

static FULL_CHANGELOG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\*\*Full Changelog\*\*:\s*(?P<url>\S+)\s*$").expect("Invalid regex")
});

static NEW_CONTRIBUTORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^new contributors$").expect("Invalid regex"));

pub struct GithubAutoExtractor;

impl GithubAutoExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GithubAutoExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for GithubAutoExtractor {
    fn format(&self) -> ReleaseFormat {
        ReleaseFormat::GithubAuto
    }

    fn extract(&self, raw: &str, _target_version: Option<&str>) -> Extraction {
        let mut metadata =
            ExtractionMetadata::new(self.format(), format_confidence(self.format(), raw));
        metadata.compare_url = FULL_CHANGELOG
            .captures(raw)
            .map(|caps| caps["url"].to_string());

        let items = section_list_items(raw)
            .into_iter()
            .filter(|entry| !NEW_CONTRIBUTORS.is_match(entry.section.trim()))
            .filter_map(|entry| match ATTRIBUTED_ITEM.captures(&entry.text) {
                Some(caps) => {
                    let number = caps
                        .name("url_number")
                        .or_else(|| caps.name("number"))
                        .map(|m| m.as_str().to_string());
                    let mut item = build_item(&caps["title"], &entry.section)?;
                    item.extend_refs(number);
                    Some(item)
                }
                None => build_item(&entry.text, &entry.section),
            })
            .collect();

        Extraction { items, metadata }
    }
}
