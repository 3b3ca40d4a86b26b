//! Keyword scoring for items without explicit signals

use whatsnew_core::CategoryId;

/// Minimum score a category needs before keyword analysis picks it
pub const KEYWORD_THRESHOLD: u32 = 2;

/// Weighted keywords per category. Phrases match on word boundaries.
const KEYWORDS: &[(CategoryId, &[(&str, u32)])] = &[
    (
        CategoryId::Breaking,
        &[
            ("breaking change", 3),
            ("breaking", 2),
            ("backwards incompatible", 3),
            ("backward incompatible", 3),
            ("no longer supported", 2),
        ],
    ),
    (
        CategoryId::Security,
        &[
            ("security", 2),
            ("vulnerability", 3),
            ("vulnerabilities", 3),
            ("cve", 3),
            ("xss", 3),
            ("csrf", 3),
            ("injection", 2),
            ("exploit", 2),
            ("sanitize", 1),
        ],
    ),
    (
        CategoryId::Features,
        &[
            ("add", 2),
            ("adds", 2),
            ("added", 2),
            ("adding", 2),
            ("introduce", 2),
            ("introduces", 2),
            ("implement", 2),
            ("implements", 2),
            ("feature", 2),
            ("new", 1),
            ("support", 1),
            ("allow", 1),
            ("allows", 1),
            ("enable", 1),
        ],
    ),
    (
        CategoryId::Fixes,
        &[
            ("fix", 2),
            ("fixes", 2),
            ("fixed", 2),
            ("bug", 2),
            ("crash", 2),
            ("regression", 2),
            ("resolve", 1),
            ("resolves", 1),
            ("resolved", 1),
            ("issue", 1),
            ("error", 1),
            ("incorrect", 1),
            ("prevent", 1),
            ("patch", 1),
        ],
    ),
    (
        CategoryId::Perf,
        &[
            ("performance", 2),
            ("faster", 2),
            ("speedup", 2),
            ("optimize", 2),
            ("optimise", 2),
            ("optimized", 2),
            ("latency", 2),
            ("speed", 1),
            ("memory", 1),
            ("cache", 1),
        ],
    ),
    (
        CategoryId::Deps,
        &[
            ("dependabot", 3),
            ("renovate", 3),
            ("bump", 2),
            ("bumps", 2),
            ("bumped", 2),
            ("dependency", 2),
            ("dependencies", 2),
            ("deps", 2),
            ("upgrade", 1),
        ],
    ),
    (
        CategoryId::Refactor,
        &[
            ("refactor", 2),
            ("refactored", 2),
            ("refactoring", 2),
            ("restructure", 2),
            ("cleanup", 1),
            ("simplify", 1),
            ("rename", 1),
            ("renamed", 1),
        ],
    ),
    (
        CategoryId::Docs,
        &[
            ("docs", 2),
            ("documentation", 2),
            ("readme", 2),
            ("typo", 2),
            ("docstring", 2),
            ("guide", 1),
            ("comment", 1),
        ],
    ),
    (
        CategoryId::Chore,
        &[
            ("chore", 2),
            ("ci", 2),
            ("lint", 1),
            ("linting", 1),
            ("build", 1),
            ("release", 1),
            ("workflow", 1),
            ("test", 1),
            ("tests", 1),
            ("tooling", 1),
        ],
    ),
];

/// Score text against every category's keyword set.
///
/// Returns the best category when its score reaches [`KEYWORD_THRESHOLD`].
/// Ties go to the category that comes first in display order.
pub fn score_keywords(text: &str) -> Option<(CategoryId, u32)> {
    let haystack = word_haystack(text);
    if haystack.trim().is_empty() {
        return None;
    }

    let mut best: Option<(CategoryId, u32)> = None;
    for id in CategoryId::ORDER {
        let score = category_score(id, &haystack);
        if score == 0 {
            continue;
        }
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((id, score));
        }
    }

    best.filter(|(_, score)| *score >= KEYWORD_THRESHOLD)
}

fn category_score(id: CategoryId, haystack: &str) -> u32 {
    KEYWORDS
        .iter()
        .find(|(category, _)| *category == id)
        .map(|(_, words)| {
            words
                .iter()
                .filter(|(word, _)| haystack.contains(&format!(" {} ", word)))
                .map(|(_, weight)| weight)
                .sum()
        })
        .unwrap_or(0)
}

/// Lowercased words separated by single spaces, padded on both ends
fn word_haystack(text: &str) -> String {
    let words: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect();
    format!(" {} ", words.join(" "))
}
