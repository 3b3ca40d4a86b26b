//! Extractor registry

use std::sync::Arc;

use tracing::debug;

use super::{
    ChangesetsExtractor, ConventionalExtractor, Extractor, GenericExtractor, GithubAutoExtractor,
    GitlabExtractor, KeepAChangelogExtractor,
};
use crate::detector::{detect_format, format_confidence};
use crate::types::{Detection, Extraction, ExtractionMetadata, ReleaseFormat};

/// Registry of available extractors
pub struct ExtractorRegistry {
    extractors: Vec<Arc<dyn Extractor>>,
}

impl ExtractorRegistry {
    /// Create a new registry with all built-in extractors
    pub fn new() -> Self {
        Self {
            extractors: vec![
                Arc::new(ChangesetsExtractor::new()),
                Arc::new(KeepAChangelogExtractor::new()),
                Arc::new(GithubAutoExtractor::new()),
                Arc::new(ConventionalExtractor::new()),
                Arc::new(GitlabExtractor::new()),
                Arc::new(GenericExtractor::new()),
            ],
        }
    }

    /// Create an empty registry
    pub fn empty() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// Register an extractor, replacing any existing one for its format
    pub fn register<E: Extractor + 'static>(&mut self, extractor: E) {
        let format = extractor.format();
        self.extractors.retain(|e| e.format() != format);
        self.extractors.push(Arc::new(extractor));
    }

    /// Get the extractor for a format
    pub fn for_format(&self, format: ReleaseFormat) -> Option<Arc<dyn Extractor>> {
        self.extractors.iter().find(|e| e.format() == format).cloned()
    }

    /// Get all registered extractors
    pub fn all(&self) -> &[Arc<dyn Extractor>] {
        &self.extractors
    }

    /// Detect the dialect (unless `hint` names it) and extract.
    ///
    /// The reported format confidence is the detection confidence. Formats
    /// without a registered extractor fall back to the generic one.
    pub fn extract_auto(
        &self,
        raw: &str,
        target_version: Option<&str>,
        hint: Option<ReleaseFormat>,
    ) -> Extraction {
        let detection = match hint {
            Some(format) => Detection {
                format,
                confidence: format_confidence(format, raw),
            },
            None => detect_format(raw),
        };

        let Some(extractor) = self
            .for_format(detection.format)
            .or_else(|| self.for_format(ReleaseFormat::Generic))
        else {
            debug!(format = %detection.format, "no extractor registered");
            return Extraction {
                items: Vec::new(),
                metadata: ExtractionMetadata::new(detection.format, detection.confidence),
            };
        };

        let mut extraction = extractor.extract(raw, target_version);
        extraction.metadata.format = detection.format;
        extraction.metadata.format_confidence = detection.confidence;
        debug!(
            format = %detection.format,
            confidence = detection.confidence,
            items = extraction.items.len(),
            "extracted release items"
        );
        extraction
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_every_format() {
        let registry = ExtractorRegistry::new();
        for format in [
            ReleaseFormat::Changesets,
            ReleaseFormat::KeepAChangelog,
            ReleaseFormat::GithubAuto,
            ReleaseFormat::ConventionalCommits,
            ReleaseFormat::Gitlab,
            ReleaseFormat::Generic,
        ] {
            assert_eq!(registry.for_format(format).unwrap().format(), format);
        }
    }

    #[test]
    fn test_empty_registry() {
        let registry = ExtractorRegistry::empty();
        assert!(registry.all().is_empty());
        let extraction = registry.extract_auto("- something", None, None);
        assert!(extraction.items.is_empty());
    }

    #[test]
    fn test_extract_auto_detects() {
        let registry = ExtractorRegistry::new();
        let extraction = registry.extract_auto("- feat(api): add endpoint\n", None, None);
        assert_eq!(
            extraction.metadata.format,
            ReleaseFormat::ConventionalCommits
        );
        assert_eq!(extraction.metadata.format_confidence, 0.85);
        assert_eq!(extraction.items[0].text, "add endpoint");
    }

    #[test]
    fn test_extract_auto_honors_hint() {
        let registry = ExtractorRegistry::new();
        let raw = "### Features (1 change)\n\n- [Add badges](g/p@0a1b2c3d) ([merge request](g/p!9))\n";
        let extraction = registry.extract_auto(raw, None, Some(ReleaseFormat::Gitlab));
        assert_eq!(extraction.metadata.format, ReleaseFormat::Gitlab);
        assert_eq!(extraction.metadata.format_confidence, 0.9);
        assert_eq!(extraction.items[0].refs, vec!["!9"]);
    }

    #[test]
    fn test_register_replaces_format() {
        let mut registry = ExtractorRegistry::new();
        let before = registry.all().len();
        registry.register(GenericExtractor::new());
        assert_eq!(registry.all().len(), before);
    }
}
