//! whatsnew Extract - Release note dialects, extraction and categorization
//!
//! This crate turns a raw block of release text into categorized items:
//! the detector classifies the dialect, an extractor pulls raw change
//! items out of it, and the categorization engine assigns each item a
//! category. The anchor extractor collects grounding references used to
//! constrain AI-assisted extraction.

pub mod anchors;
pub mod categorize;
pub mod detector;
pub mod extractors;
pub mod text;
pub mod types;

pub use anchors::{extract_anchors, format_anchors_for_prompt, Anchors};
pub use categorize::{
    categorize_items, infer_item_category, map_section_to_category, normalize_section_name,
    order_categories, CategoryConfidence, CategoryReason, Inference,
};
pub use detector::{detect_format, format_confidence};
pub use extractors::{extract_commit_message, Extractor, ExtractorRegistry};
pub use types::{Detection, Extraction, ExtractionMetadata, ReleaseFormat};
