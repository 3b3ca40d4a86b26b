//! Line-level helpers shared by every extractor
//!
//! Reference hygiene, scope normalization, markdown list/heading parsing
//! and Conventional Commits line parsing live here so each dialect applies
//! the same rules.

use std::sync::LazyLock;

use regex::Regex;

/// Conventional commit types recognised on a line
pub const CONVENTIONAL_TYPES: [&str; 11] = [
    "feat", "fix", "docs", "style", "refactor", "perf", "test", "build", "ci", "chore", "revert",
];

/// `(#1)` or `(#1, #2)` at the end of a line, before closing punctuation
static TRAILING_REFS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*\(\s*#\d+(?:\s*,\s*#\d+)*\s*\)[.;,!]*\s*$").expect("Invalid regex")
});

/// `([#1](https://...))` at the end of a line
static TRAILING_LINKED_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*\(\s*\[#(\d+)\]\([^)]*\)\s*\)[.;,!]*\s*$").expect("Invalid regex")
});

/// `([abc1234](https://...))` commit links at the end of a line
static TRAILING_COMMIT_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*\(\s*\[`?[0-9a-f]{7,40}`?\]\([^)]*\)\s*\)[.;,!]*\s*$").expect("Invalid regex")
});

static REF_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\d+)").expect("Invalid regex"));

/// `#123` not glued to a word, an HTML entity or a URL fragment
static INLINE_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^\w&/#])#(\d+)\b").expect("Invalid regex"));

static GITHUB_NUMBERED_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://github\.com/[\w.-]+/[\w.-]+/(?:pull|issues)/(\d+)")
        .expect("Invalid regex")
});

static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[-*+]|\d+[.)])\s+(.*)$").expect("Invalid regex"));

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.*?)\s*#*\s*$").expect("Invalid regex"));

static CONVENTIONAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<type>[a-zA-Z]+)(?:\((?P<scope>[^)]*)\))?(?P<breaking>!)?:\s+(?P<subject>\S.*)$",
    )
    .expect("Invalid regex")
});

static NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}]+").expect("Invalid regex"));

/// A parsed `type(scope)!: subject` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionalLine {
    /// Lowercased commit type
    pub commit_type: String,
    /// Trimmed scope, `None` when absent or blank
    pub scope: Option<String>,
    /// `!` marker present
    pub breaking: bool,
    /// Everything after the colon
    pub subject: String,
}

/// Parse a Conventional Commits line with a known type
pub fn parse_conventional(line: &str) -> Option<ConventionalLine> {
    let caps = CONVENTIONAL.captures(line.trim())?;

    let commit_type = caps.name("type")?.as_str().to_lowercase();
    if !CONVENTIONAL_TYPES.contains(&commit_type.as_str()) {
        return None;
    }

    Some(ConventionalLine {
        commit_type,
        scope: caps.name("scope").and_then(|m| normalize_scope(m.as_str())),
        breaking: caps.name("breaking").is_some(),
        subject: caps.name("subject")?.as_str().trim().to_string(),
    })
}

/// Trim whitespace inside a parenthesized scope; blank scopes become `None`
pub fn normalize_scope(raw: &str) -> Option<String> {
    let scope = raw.trim();
    if scope.is_empty() {
        None
    } else {
        Some(scope.to_string())
    }
}

/// Strip every trailing reference group and return the numbers it held.
///
/// Trailing commit links are removed without being recorded.
pub fn strip_trailing_refs(text: &str) -> (String, Vec<String>) {
    let mut remaining = text.trim_end().to_string();
    let mut groups: Vec<Vec<String>> = Vec::new();

    loop {
        if let Some(m) = TRAILING_REFS.find(&remaining) {
            let numbers = REF_NUMBER
                .captures_iter(m.as_str())
                .map(|c| c[1].to_string())
                .collect();
            groups.push(numbers);
            remaining.truncate(m.start());
        } else if let Some(caps) = TRAILING_LINKED_REF.captures(&remaining) {
            let start = caps.get(0).map(|m| m.start()).unwrap_or(remaining.len());
            groups.push(vec![caps[1].to_string()]);
            remaining.truncate(start);
        } else if let Some(m) = TRAILING_COMMIT_LINK.find(&remaining) {
            remaining.truncate(m.start());
        } else {
            break;
        }
    }

    // groups were collected right-to-left
    let refs = groups.into_iter().rev().flatten().collect();
    (remaining.trim_end().to_string(), refs)
}

/// References that stay inside the text: `#123` and GitHub pull/issue URLs
pub fn inline_refs(text: &str) -> Vec<String> {
    let mut refs = Vec::new();
    for caps in INLINE_REF.captures_iter(text) {
        push_unique(&mut refs, caps[1].to_string());
    }
    for caps in GITHUB_NUMBERED_URL.captures_iter(text) {
        push_unique(&mut refs, caps[1].to_string());
    }
    refs
}

/// Apply reference hygiene to a line of item text.
///
/// A trailing reference group is removed and its numbers appended after any
/// references that remain embedded in the text.
pub fn apply_reference_hygiene(text: &str) -> (String, Vec<String>) {
    let (stripped, trailing) = strip_trailing_refs(text);
    let mut refs = inline_refs(&stripped);
    for reference in trailing {
        push_unique(&mut refs, reference);
    }
    (stripped, refs)
}

/// Content of a markdown list item line
pub fn parse_list_item(line: &str) -> Option<&str> {
    LIST_ITEM
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
}

/// Level and title of a markdown ATX heading
pub fn parse_heading(line: &str) -> Option<(usize, &str)> {
    let caps = HEADING.captures(line.trim_end())?;
    let level = caps.get(1)?.as_str().len();
    let title = caps.get(2)?.as_str().trim();
    Some((level, title))
}

/// Line with any list marker removed
pub fn strip_list_marker(line: &str) -> &str {
    parse_list_item(line).unwrap_or_else(|| line.trim())
}

/// Whether item text is worth keeping at all
pub fn is_valid_item_text(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.chars().count() >= 3 && trimmed.chars().any(char::is_alphabetic)
}

/// Normalize text for duplicate detection.
///
/// Lowercases, drops `#123` references and collapses every run of
/// punctuation and whitespace to one space.
pub fn normalize_text(text: &str) -> String {
    let without_refs = REF_NUMBER.replace_all(text, " ");
    let lowered = without_refs.to_lowercase();
    NON_ALNUM.replace_all(&lowered, " ").trim().to_string()
}

fn push_unique(refs: &mut Vec<String>, reference: String) {
    if !refs.contains(&reference) {
        refs.push(reference);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_conventional_with_scope() {
        let parsed = parse_conventional("feat(api): add endpoint").unwrap();
        assert_eq!(parsed.commit_type, "feat");
        assert_eq!(parsed.scope.as_deref(), Some("api"));
        assert_eq!(parsed.subject, "add endpoint");
        assert!(!parsed.breaking);
    }

    #[test]
    fn test_parse_conventional_padded_scope() {
        let parsed = parse_conventional("feat(  www ): minor updates").unwrap();
        assert_eq!(parsed.scope.as_deref(), Some("www"));
    }

    #[test]
    fn test_parse_conventional_breaking_marker() {
        let parsed = parse_conventional("refactor(core)!: drop legacy api").unwrap();
        assert!(parsed.breaking);
        assert_eq!(parsed.commit_type, "refactor");
    }

    #[test]
    fn test_parse_conventional_rejects_unknown_type() {
        assert!(parse_conventional("Note: this is prose").is_none());
        assert!(parse_conventional("Just a regular line").is_none());
    }

    #[test]
    fn test_strip_single_trailing_ref() {
        let (text, refs) = strip_trailing_refs("minor updates (#5749)");
        assert_eq!(text, "minor updates");
        assert_eq!(refs, vec!["5749"]);
    }

    #[test]
    fn test_strip_trailing_ref_group() {
        let (text, refs) = strip_trailing_refs("fix crash (#123, #456)");
        assert_eq!(text, "fix crash");
        assert_eq!(refs, vec!["123", "456"]);
    }

    #[test]
    fn test_strip_ref_before_closing_punctuation() {
        let (text, refs) = apply_reference_hygiene("Fix crash on exit (#12).");
        assert_eq!(text, "Fix crash on exit");
        assert_eq!(refs, vec!["12"]);

        let (text, refs) = strip_trailing_refs("Add export (#3, #4);");
        assert_eq!(text, "Add export");
        assert_eq!(refs, vec!["3", "4"]);
    }

    #[test]
    fn test_strip_linked_ref_and_commit() {
        let (text, refs) = strip_trailing_refs(
            "add thing ([#12](https://github.com/o/r/issues/12)) ([abc1234](https://github.com/o/r/commit/abc1234))",
        );
        assert_eq!(text, "add thing");
        assert_eq!(refs, vec!["12"]);
    }

    #[test]
    fn test_mid_sentence_ref_is_preserved() {
        let (text, refs) = apply_reference_hygiene("revert #12 because it broke login (#15)");
        assert_eq!(text, "revert #12 because it broke login");
        assert_eq!(refs, vec!["12", "15"]);
    }

    #[test]
    fn test_inline_refs_ignore_entities_and_fragments() {
        let refs = inline_refs("see &#39; and https://x.dev/page#12 and #7");
        assert_eq!(refs, vec!["7"]);
    }

    #[test]
    fn test_inline_refs_from_urls() {
        let refs = inline_refs("in https://github.com/o/r/pull/42 and https://github.com/o/r/issues/7");
        assert_eq!(refs, vec!["42", "7"]);
    }

    #[test]
    fn test_parse_list_and_heading() {
        assert_eq!(parse_list_item("  - item one"), Some("item one"));
        assert_eq!(parse_list_item("1. numbered"), Some("numbered"));
        assert_eq!(parse_list_item("plain"), None);
        assert_eq!(parse_heading("### Bug Fixes"), Some((3, "Bug Fixes")));
        assert_eq!(parse_heading("#123 is not a heading"), None);
    }

    #[test]
    fn test_item_text_validation() {
        assert!(is_valid_item_text("fix"));
        assert!(!is_valid_item_text("ok"));
        assert!(!is_valid_item_text("1234"));
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("Add  Endpoint! (#12)"), "add endpoint");
        assert_eq!(normalize_text("add endpoint"), normalize_text("Add endpoint."));
    }
}
