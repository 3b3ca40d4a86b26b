//! Release note dialect detection

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use whatsnew_core::CategoryId;

use crate::categorize::map_section_to_category;
use crate::text::{parse_conventional, parse_heading, strip_list_marker};
use crate::types::{Detection, ReleaseFormat};

static CHANGESETS_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^###\s+(?:Major|Minor|Patch)\s+Changes\s*$").expect("Invalid regex")
});

static KAC_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^##\s+\[(?:v?\d+\.\d+\.\d+[^\]]*|Unreleased)\]").expect("Invalid regex")
});

static KAC_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^###\s+(?:Added|Changed|Deprecated|Removed|Fixed|Security)\s*$")
        .expect("Invalid regex")
});

static WHATS_CHANGED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^##\s+what['’]s\s+changed\s*$").expect("Invalid regex")
});

static PULL_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://github\.com/[\w.-]+/[\w.-]+/pull/\d+").expect("Invalid regex")
});

/// Confidence for the fixed-signature dialects and structured generic text
const STRUCTURED_CONFIDENCE: f64 = 0.9;
const CONVENTIONAL_CONFIDENCE: f64 = 0.85;
const BASIC_HEADINGS_CONFIDENCE: f64 = 0.7;
const PROSE_CONFIDENCE: f64 = 0.6;
const MINIMAL_CONFIDENCE: f64 = 0.3;

/// Prose shorter than this is treated as minimal content
const PROSE_MIN_LEN: usize = 100;

/// Classify a block of release text.
///
/// Signatures are checked in a fixed order and the first match wins; text
/// matching none of them is `generic`.
pub fn detect_format(text: &str) -> Detection {
    let format = if CHANGESETS_SECTION.is_match(text) {
        ReleaseFormat::Changesets
    } else if KAC_VERSION.is_match(text) || KAC_SECTION.is_match(text) {
        ReleaseFormat::KeepAChangelog
    } else if WHATS_CHANGED.is_match(text) && PULL_URL.is_match(text) {
        ReleaseFormat::GithubAuto
    } else if is_mostly_conventional(text) {
        ReleaseFormat::ConventionalCommits
    } else {
        ReleaseFormat::Generic
    };

    let confidence = format_confidence(format, text);
    debug!(format = %format, confidence, "detected release format");
    Detection { format, confidence }
}

/// Confidence for text in a given dialect.
///
/// Used both after detection and when a provider supplied the dialect.
pub fn format_confidence(format: ReleaseFormat, text: &str) -> f64 {
    match format {
        ReleaseFormat::Changesets
        | ReleaseFormat::KeepAChangelog
        | ReleaseFormat::GithubAuto
        | ReleaseFormat::Gitlab => STRUCTURED_CONFIDENCE,
        ReleaseFormat::ConventionalCommits => CONVENTIONAL_CONFIDENCE,
        ReleaseFormat::Generic => generic_confidence(text),
    }
}

fn generic_confidence(text: &str) -> f64 {
    let mut has_headings = false;

    for line in text.lines() {
        let Some((level, title)) = parse_heading(line) else {
            continue;
        };
        if !(2..=3).contains(&level) || title.is_empty() {
            continue;
        }
        if map_section_to_category(title) != CategoryId::Other {
            return STRUCTURED_CONFIDENCE;
        }
        has_headings = true;
    }

    if has_headings {
        BASIC_HEADINGS_CONFIDENCE
    } else if text.trim().len() >= PROSE_MIN_LEN {
        PROSE_CONFIDENCE
    } else {
        MINIMAL_CONFIDENCE
    }
}

/// Strictly more than half of the content lines are conventional commits
fn is_mostly_conventional(text: &str) -> bool {
    let mut candidates = 0usize;
    let mut matches = 0usize;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || parse_heading(trimmed).is_some() {
            continue;
        }
        candidates += 1;
        if parse_conventional(strip_list_marker(trimmed)).is_some() {
            matches += 1;
        }
    }

    candidates > 0 && matches * 2 > candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_changesets() {
        let text = "## 2.0.0\n\n### Major Changes\n\n- abc1234: drop node 14\n";
        let detection = detect_format(text);
        assert_eq!(detection.format, ReleaseFormat::Changesets);
        assert_eq!(detection.confidence, 0.9);
    }

    #[test]
    fn test_detect_keep_a_changelog() {
        let text = "# Changelog\n\n## [1.2.0] - 2024-01-01\n\n### Added\n\n- New thing\n";
        assert_eq!(detect_format(text).format, ReleaseFormat::KeepAChangelog);

        let sections_only = "### Fixed\n\n- A bug\n";
        assert_eq!(
            detect_format(sections_only).format,
            ReleaseFormat::KeepAChangelog
        );
    }

    #[test]
    fn test_detect_github_auto() {
        let text = "## What's Changed\n* Add x by @a in https://github.com/o/r/pull/1\n";
        let detection = detect_format(text);
        assert_eq!(detection.format, ReleaseFormat::GithubAuto);
        assert_eq!(detection.confidence, 0.9);
    }

    #[test]
    fn test_whats_changed_without_pull_urls_is_generic() {
        let text = "## What's Changed\n* Add x\n";
        assert_eq!(detect_format(text).format, ReleaseFormat::Generic);
    }

    #[test]
    fn test_detect_conventional() {
        let text = "- feat(api): add endpoint\n- fix: crash\n- tidy things\n";
        let detection = detect_format(text);
        assert_eq!(detection.format, ReleaseFormat::ConventionalCommits);
        assert_eq!(detection.confidence, 0.85);
    }

    #[test]
    fn test_half_conventional_is_not_enough() {
        let text = "feat: add endpoint\nsome prose line\n";
        assert_eq!(detect_format(text).format, ReleaseFormat::Generic);
    }

    #[test]
    fn test_generic_confidence_levels() {
        let structured = "## 🚀 Features\n\n- thing\n";
        assert_eq!(detect_format(structured).confidence, 0.9);

        let basic = "## Highlights\n\n- thing\n";
        assert_eq!(detect_format(basic).confidence, 0.7);

        let prose = "This release focuses on stability and brings a number of small \
                     improvements across the board that users have asked about.";
        assert!(prose.len() >= 100);
        assert_eq!(detect_format(prose).confidence, 0.6);

        assert_eq!(detect_format("Small tweaks").confidence, 0.3);
        assert_eq!(detect_format("").confidence, 0.3);
        assert_eq!(detect_format("   \n  ").confidence, 0.3);
    }

    #[test]
    fn test_format_confidence_for_hinted_gitlab() {
        assert_eq!(format_confidence(ReleaseFormat::Gitlab, ""), 0.9);
    }
}
