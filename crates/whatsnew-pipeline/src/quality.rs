//! Quality gate for extracted results

use serde::{Deserialize, Serialize};
use whatsnew_core::{Category, CategoryId};

/// Share of `other` items above which a result counts as poorly sorted
const HIGH_OTHER_RATIO: f64 = 0.8;
/// Raw content length above which an empty result is suspicious
const EMPTY_RESULT_MIN_RAW_LEN: usize = 150;
/// Raw content shorter than this is not expected to hold items
const EXPECTED_ITEMS_MIN_RAW_LEN: usize = 100;
/// Characters of raw content per expected item
const CHARS_PER_EXPECTED_ITEM: usize = 150;
/// Fraction of expected items below which items are considered missing
const MIN_EXPECTED_ITEM_RATIO: f64 = 0.5;

const ALL_OTHER_CAP: f64 = 0.4;
const HIGH_OTHER_CAP: f64 = 0.5;
const EMPTY_CAP: f64 = 0.3;
const MISSING_ITEMS_CAP: f64 = 0.5;

/// Why a result failed the quality gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityReason {
    LowConfidence,
    AllItemsOther,
    HighOtherRatio,
    EmptyCategories,
    MissingExpectedItems,
}

/// Quality verdict for a result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityAssessment {
    pub score: f64,
    pub should_fallback_to_ai: bool,
    pub reasons: Vec<QualityReason>,
}

/// Scores a categorized result and decides whether AI should take over
#[derive(Debug, Clone)]
pub struct QualityAssessor {
    confidence_threshold: f64,
}

impl QualityAssessor {
    pub fn new(confidence_threshold: f64) -> Self {
        Self {
            confidence_threshold,
        }
    }

    /// Assess a result.
    ///
    /// The score starts at `confidence` and is lowered to the cap of every
    /// problem found. Any problem means the result should go to AI.
    pub fn assess(
        &self,
        categories: &[Category],
        confidence: f64,
        raw_content_len: usize,
    ) -> QualityAssessment {
        let mut score = confidence;
        let mut reasons = Vec::new();

        let total: usize = categories.iter().map(|c| c.items.len()).sum();
        let other: usize = categories
            .iter()
            .filter(|c| c.id == CategoryId::Other)
            .map(|c| c.items.len())
            .sum();

        if confidence < self.confidence_threshold {
            reasons.push(QualityReason::LowConfidence);
        }

        if total > 0 && other == total {
            reasons.push(QualityReason::AllItemsOther);
            score = score.min(ALL_OTHER_CAP);
        } else if total > 0 && other as f64 / total as f64 > HIGH_OTHER_RATIO {
            reasons.push(QualityReason::HighOtherRatio);
            score = score.min(HIGH_OTHER_CAP);
        }

        if total == 0 && raw_content_len > EMPTY_RESULT_MIN_RAW_LEN {
            reasons.push(QualityReason::EmptyCategories);
            score = score.min(EMPTY_CAP);
        }

        let expected = if raw_content_len < EXPECTED_ITEMS_MIN_RAW_LEN {
            0
        } else {
            raw_content_len / CHARS_PER_EXPECTED_ITEM
        };
        if expected > 0 && (total as f64 / expected as f64) < MIN_EXPECTED_ITEM_RATIO {
            reasons.push(QualityReason::MissingExpectedItems);
            score = score.min(MISSING_ITEMS_CAP);
        }

        QualityAssessment {
            score,
            should_fallback_to_ai: !reasons.is_empty(),
            reasons,
        }
    }
}

impl Default for QualityAssessor {
    fn default() -> Self {
        Self::new(0.6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use whatsnew_core::ExtractedItem;

    fn items(n: usize) -> Vec<ExtractedItem> {
        (0..n).map(|i| ExtractedItem::new(format!("item {}", i))).collect()
    }

    #[test]
    fn test_good_result_passes() {
        let categories = vec![Category::with_items(CategoryId::Features, items(3))];
        let assessment = QualityAssessor::default().assess(&categories, 0.9, 300);
        assert!(!assessment.should_fallback_to_ai);
        assert!(assessment.reasons.is_empty());
        assert_eq!(assessment.score, 0.9);
    }

    #[test]
    fn test_threshold_is_strict() {
        let categories = vec![Category::with_items(CategoryId::Features, items(1))];
        let at = QualityAssessor::default().assess(&categories, 0.6, 50);
        assert!(!at.should_fallback_to_ai);

        let below = QualityAssessor::default().assess(&categories, 0.59, 50);
        assert_eq!(below.reasons, vec![QualityReason::LowConfidence]);
        assert!(below.should_fallback_to_ai);
    }

    #[test]
    fn test_all_other() {
        let categories = vec![Category::with_items(CategoryId::Other, items(2))];
        let assessment = QualityAssessor::default().assess(&categories, 0.9, 50);
        assert_eq!(assessment.reasons, vec![QualityReason::AllItemsOther]);
        assert_eq!(assessment.score, 0.4);
    }

    #[test]
    fn test_high_other_ratio() {
        let categories = vec![
            Category::with_items(CategoryId::Fixes, items(1)),
            Category::with_items(CategoryId::Other, items(9)),
        ];
        let assessment = QualityAssessor::default().assess(&categories, 0.9, 50);
        assert_eq!(assessment.reasons, vec![QualityReason::HighOtherRatio]);
        assert_eq!(assessment.score, 0.5);
    }

    #[test]
    fn test_empty_long_content() {
        let assessment = QualityAssessor::default().assess(&[], 0.6, 2000);
        assert_eq!(
            assessment.reasons,
            vec![
                QualityReason::EmptyCategories,
                QualityReason::MissingExpectedItems
            ]
        );
        assert_eq!(assessment.score, 0.3);
        assert!(assessment.should_fallback_to_ai);
    }

    #[test]
    fn test_missing_expected_items() {
        // 1500 chars -> 10 expected, 4 found
        let categories = vec![Category::with_items(CategoryId::Features, items(4))];
        let assessment = QualityAssessor::default().assess(&categories, 0.9, 1500);
        assert_eq!(assessment.reasons, vec![QualityReason::MissingExpectedItems]);
        assert_eq!(assessment.score, 0.5);

        // 5 of 10 is enough
        let categories = vec![Category::with_items(CategoryId::Features, items(5))];
        let assessment = QualityAssessor::default().assess(&categories, 0.9, 1500);
        assert!(!assessment.should_fallback_to_ai);
    }

    #[test]
    fn test_reasons_match_fallback_flag() {
        for (n, confidence, raw_len) in [(0, 0.2, 0), (3, 0.9, 100), (0, 0.9, 160), (1, 0.7, 900)] {
            let categories = vec![Category::with_items(CategoryId::Fixes, items(n))];
            let assessment = QualityAssessor::default().assess(&categories, confidence, raw_len);
            assert_eq!(assessment.should_fallback_to_ai, !assessment.reasons.is_empty());
        }
    }
}
