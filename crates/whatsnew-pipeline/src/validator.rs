//! Item text validation

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static BARE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<?https?://\S+>?$").expect("Invalid regex"));

static BARE_REFS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\(?\s*[#!]\d+(?:[\s,]+[#!]\d+)*\s*\)?$").expect("Invalid regex")
});

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,6}\s").expect("Invalid regex"));

static HORIZONTAL_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:-{3,}|\*{3,}|_{3,}|={3,})$").expect("Invalid regex"));

/// Outcome of validating one piece of text
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Validation {
    pub valid: bool,
    /// Quality estimate in [0, 1]
    pub score: f64,
}

impl Validation {
    pub fn rejected() -> Self {
        Self {
            valid: false,
            score: 0.0,
        }
    }
}

/// Decides whether unscored item text is worth keeping
pub trait TextValidator: Send + Sync {
    fn validate(&self, text: &str) -> Validation;
}

/// Rule-based validator
#[derive(Debug, Clone)]
pub struct HeuristicValidator {
    min_length: usize,
}

impl HeuristicValidator {
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }
}

impl Default for HeuristicValidator {
    fn default() -> Self {
        Self::new(3)
    }
}

impl TextValidator for HeuristicValidator {
    fn validate(&self, text: &str) -> Validation {
        let text = text.trim();

        if text.chars().count() < self.min_length
            || !text.chars().any(char::is_alphabetic)
            || BARE_URL.is_match(text)
            || BARE_REFS.is_match(text)
            || HEADING.is_match(text)
            || HORIZONTAL_RULE.is_match(text)
        {
            return Validation::rejected();
        }

        // more words, more confidence, up to eight
        let words = text.split_whitespace().count().min(8) as f64;
        Validation {
            valid: true,
            score: 0.5 + 0.5 * words / 8.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_real_text() {
        let validator = HeuristicValidator::default();
        let validation = validator.validate("Add support for streaming responses");
        assert!(validation.valid);
        assert!(validation.score > 0.5);
    }

    #[test]
    fn test_rejects_noise() {
        let validator = HeuristicValidator::default();
        for text in [
            "ok",
            "1234",
            "https://github.com/o/r/pull/1",
            "#12, #13",
            "(#12)",
            "## Heading",
            "---",
            "   ",
        ] {
            assert!(!validator.validate(text).valid, "{text:?} should be rejected");
        }
    }

    #[test]
    fn test_min_length_is_configurable() {
        let validator = HeuristicValidator::new(10);
        assert!(!validator.validate("Fix crash").valid);
        assert!(validator.validate("Fix the crash").valid);
    }
}
