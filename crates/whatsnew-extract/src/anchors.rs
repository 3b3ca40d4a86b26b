//! Grounding anchors
//!
//! Anchors are the references that provably exist in the raw text. They
//! are handed to AI-assisted extraction so its output can be checked
//! against them.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static HASH_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^\w&/#])#(\d+)\b").expect("Invalid regex"));

static PULL_URL_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://github\.com/[\w.-]+/[\w.-]+/pull/(\d+)").expect("Invalid regex")
});

static ISSUE_URL_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://github\.com/[\w.-]+/[\w.-]+/issues/(\d+)").expect("Invalid regex")
});

static GITHUB_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://github\.com/[^\s<>()\[\]"'`]+"#).expect("Invalid regex")
});

static HEX_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[0-9a-fA-F]{7,40}\b").expect("Invalid regex"));

/// Commit SHAs listed before the rest are summarized
const MAX_PROMPT_SHAS: usize = 5;
/// URLs listed before the rest are summarized
const MAX_PROMPT_URLS: usize = 10;

/// References found in raw release text, each list in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anchors {
    /// Pull request numbers (`#12`, `/pull/12`)
    pub pr_refs: Vec<String>,
    /// Issue numbers (`/issues/12`)
    pub issue_refs: Vec<String>,
    /// Lowercased commit SHAs
    pub commit_shas: Vec<String>,
    /// GitHub URLs
    pub urls: Vec<String>,
}

impl Anchors {
    /// Whether nothing was found
    pub fn is_empty(&self) -> bool {
        self.pr_refs.is_empty()
            && self.issue_refs.is_empty()
            && self.commit_shas.is_empty()
            && self.urls.is_empty()
    }

    /// Whether a reference number (with or without `#`) appeared in the text
    pub fn knows_ref(&self, reference: &str) -> bool {
        let number = reference.trim().trim_start_matches('#');
        self.pr_refs.iter().any(|r| r == number) || self.issue_refs.iter().any(|r| r == number)
    }
}

/// Collect anchors from raw text
pub fn extract_anchors(text: &str) -> Anchors {
    let mut anchors = Anchors::default();

    for caps in HASH_REF.captures_iter(text) {
        push_unique(&mut anchors.pr_refs, &caps[1]);
    }
    for caps in PULL_URL_NUMBER.captures_iter(text) {
        push_unique(&mut anchors.pr_refs, &caps[1]);
    }
    for caps in ISSUE_URL_NUMBER.captures_iter(text) {
        push_unique(&mut anchors.issue_refs, &caps[1]);
    }
    for m in GITHUB_URL.find_iter(text) {
        let url = m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?']);
        push_unique(&mut anchors.urls, url);
    }
    for m in HEX_TOKEN.find_iter(text) {
        let token = m.as_str();
        let has_letter = token.chars().any(|c| c.is_ascii_alphabetic());
        let has_digit = token.chars().any(|c| c.is_ascii_digit());
        if has_letter && has_digit {
            push_unique(&mut anchors.commit_shas, &token.to_lowercase());
        }
    }

    anchors
}

/// Render anchors as a prompt fragment.
///
/// Long SHA and URL lists are cut off with a `(+N more)` marker. Empty
/// anchors render as an empty string.
pub fn format_anchors_for_prompt(anchors: &Anchors) -> String {
    if anchors.is_empty() {
        return String::new();
    }

    let mut lines = Vec::new();

    if !anchors.pr_refs.is_empty() {
        lines.push(format!("PR references: {}", hash_list(&anchors.pr_refs)));
    }
    if !anchors.issue_refs.is_empty() {
        lines.push(format!("Issue references: {}", hash_list(&anchors.issue_refs)));
    }
    if !anchors.commit_shas.is_empty() {
        lines.push(format!(
            "Commit SHAs: {}",
            bounded(&anchors.commit_shas, MAX_PROMPT_SHAS, ", ")
        ));
    }
    if !anchors.urls.is_empty() {
        lines.push(format!(
            "URLs: {}",
            bounded(&anchors.urls, MAX_PROMPT_URLS, ", ")
        ));
    }

    lines.join("\n")
}

fn hash_list(refs: &[String]) -> String {
    refs.iter()
        .map(|r| format!("#{}", r))
        .collect::<Vec<_>>()
        .join(", ")
}

fn bounded(values: &[String], limit: usize, separator: &str) -> String {
    let shown = values
        .iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(separator);

    if values.len() > limit {
        format!("{} (+{} more)", shown, values.len() - limit)
    } else {
        shown
    }
}

fn push_unique(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|v| v == value) {
        values.push(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refs_and_urls() {
        let text = "* Add x by @a in https://github.com/o/r/pull/12\n\
                    * Fix y (#15), closes https://github.com/o/r/issues/7.\n\
                    * Again #12";
        let anchors = extract_anchors(text);
        assert_eq!(anchors.pr_refs, vec!["15", "12"]);
        assert_eq!(anchors.issue_refs, vec!["7"]);
        assert_eq!(
            anchors.urls,
            vec![
                "https://github.com/o/r/pull/12",
                "https://github.com/o/r/issues/7"
            ]
        );
        assert!(anchors.knows_ref("#12"));
        assert!(anchors.knows_ref("7"));
        assert!(!anchors.knows_ref("99"));
    }

    #[test]
    fn test_commit_shas() {
        let anchors = extract_anchors("abc1234: fix\nsee DEADBEEF99 and 1234567 and deadbeef");
        assert_eq!(anchors.commit_shas, vec!["abc1234", "deadbeef99"]);
    }

    #[test]
    fn test_html_entities_are_not_refs() {
        let anchors = extract_anchors("it&#39;s fine");
        assert!(anchors.pr_refs.is_empty());
    }

    #[test]
    fn test_empty_prompt_fragment() {
        assert_eq!(format_anchors_for_prompt(&extract_anchors("nothing here")), "");
    }

    #[test]
    fn test_prompt_fragment_is_bounded() {
        let anchors = Anchors {
            commit_shas: (0..8).map(|i| format!("abc123{}", i)).collect(),
            urls: (0..12)
                .map(|i| format!("https://github.com/o/r/pull/{}", i))
                .collect(),
            ..Default::default()
        };

        let fragment = format_anchors_for_prompt(&anchors);
        assert!(fragment.contains("abc1234 (+3 more)"));
        assert!(!fragment.contains("abc1235"));
        assert!(fragment.contains("pull/9 (+2 more)"));
        assert!(!fragment.contains("pull/10"));
    }
}
