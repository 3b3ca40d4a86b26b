//! Section title normalization and mapping

use std::sync::LazyLock;

use regex::Regex;
use whatsnew_core::CategoryId;

/// `:rocket:` style shortcodes
static SHORTCODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?::[a-z0-9_+-]+:\s*)+").expect("Invalid regex"));

/// `(3 changes)` counts GitLab appends to section titles
static CHANGE_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(\d+\s+changes?\)\s*$").expect("Invalid regex"));

/// Section names, after normalization, and the category they map to
const SECTION_TABLE: &[(&str, CategoryId)] = &[
    ("breaking changes", CategoryId::Breaking),
    ("breaking change", CategoryId::Breaking),
    ("breaking", CategoryId::Breaking),
    ("major changes", CategoryId::Breaking),
    ("removed", CategoryId::Breaking),
    ("features", CategoryId::Features),
    ("feature", CategoryId::Features),
    ("new features", CategoryId::Features),
    ("added", CategoryId::Features),
    ("enhancements", CategoryId::Features),
    ("enhancement", CategoryId::Features),
    ("improvements", CategoryId::Features),
    ("minor changes", CategoryId::Features),
    ("what's new", CategoryId::Features),
    ("what’s new", CategoryId::Features),
    ("new", CategoryId::Features),
    ("bug fixes", CategoryId::Fixes),
    ("bug fix", CategoryId::Fixes),
    ("bugfixes", CategoryId::Fixes),
    ("fixes", CategoryId::Fixes),
    ("fixed", CategoryId::Fixes),
    ("patch changes", CategoryId::Fixes),
    ("security", CategoryId::Security),
    ("security fixes", CategoryId::Security),
    ("security updates", CategoryId::Security),
    ("performance", CategoryId::Perf),
    ("performance improvements", CategoryId::Perf),
    ("perf", CategoryId::Perf),
    ("dependencies", CategoryId::Deps),
    ("dependency updates", CategoryId::Deps),
    ("dependency upgrades", CategoryId::Deps),
    ("deps", CategoryId::Deps),
    ("documentation", CategoryId::Docs),
    ("docs", CategoryId::Docs),
    ("refactor", CategoryId::Refactor),
    ("refactoring", CategoryId::Refactor),
    ("code refactoring", CategoryId::Refactor),
    ("chores", CategoryId::Chore),
    ("chore", CategoryId::Chore),
    ("miscellaneous chores", CategoryId::Chore),
    ("maintenance", CategoryId::Chore),
    ("internal", CategoryId::Chore),
    ("build system", CategoryId::Chore),
    ("ci", CategoryId::Chore),
    ("continuous integration", CategoryId::Chore),
    ("tests", CategoryId::Chore),
];

/// Normalize a section title for lookup.
///
/// Lowercases, strips leading emoji, symbols and `:shortcode:` prefixes,
/// a trailing `(N changes)` count and trailing colons, then trims.
pub fn normalize_section_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let without_codes = SHORTCODE.replace(&lowered, "");
    let without_prefix =
        without_codes.trim_start_matches(|c: char| !c.is_alphanumeric());
    let without_count = CHANGE_COUNT.replace(without_prefix, "");
    without_count
        .trim()
        .trim_end_matches(':')
        .trim()
        .to_string()
}

/// Map a section title to a category; unknown titles map to `other`
pub fn map_section_to_category(name: &str) -> CategoryId {
    let normalized = normalize_section_name(name);
    SECTION_TABLE
        .iter()
        .find(|(section, _)| *section == normalized)
        .map(|(_, id)| *id)
        .unwrap_or(CategoryId::Other)
}
