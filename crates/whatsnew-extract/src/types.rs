//! Extraction types

use serde::{Deserialize, Serialize};
use whatsnew_core::error::ExtractError;
use whatsnew_core::ExtractedItem;

/// A recognizable release note dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReleaseFormat {
    /// Changesets generated changelogs
    Changesets,
    /// Keep a Changelog
    KeepAChangelog,
    /// GitHub auto-generated release notes
    GithubAuto,
    /// Conventional Commits lines
    ConventionalCommits,
    /// GitLab generated changelogs
    Gitlab,
    /// Anything else
    Generic,
}

impl ReleaseFormat {
    /// Stable identifier string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Changesets => "changesets",
            Self::KeepAChangelog => "keep-a-changelog",
            Self::GithubAuto => "github-auto",
            Self::ConventionalCommits => "conventional-commits",
            Self::Gitlab => "gitlab",
            Self::Generic => "generic",
        }
    }
}

impl std::fmt::Display for ReleaseFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReleaseFormat {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "changesets" => Ok(Self::Changesets),
            "keep-a-changelog" | "keepachangelog" => Ok(Self::KeepAChangelog),
            "github-auto" | "github" => Ok(Self::GithubAuto),
            "conventional-commits" | "conventional" => Ok(Self::ConventionalCommits),
            "gitlab" => Ok(Self::Gitlab),
            "generic" => Ok(Self::Generic),
            other => Err(ExtractError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Result of dialect detection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Detected dialect
    pub format: ReleaseFormat,
    /// Certainty in [0, 1]
    pub confidence: f64,
}

/// Metadata an extractor reports alongside its items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionMetadata {
    /// Dialect the extractor handles
    pub format: ReleaseFormat,
    /// Dialect certainty in [0, 1]
    pub format_confidence: f64,
    /// Lead paragraph, when the text has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Version the extracted block belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Release date found next to the version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Comparison link found in the text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_url: Option<String>,
    /// The part of the input the items came from, when narrower than the input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoped_content: Option<String>,
}

impl ExtractionMetadata {
    /// Create metadata for a format
    pub fn new(format: ReleaseFormat, format_confidence: f64) -> Self {
        Self {
            format,
            format_confidence,
            summary: None,
            version: None,
            date: None,
            compare_url: None,
            scoped_content: None,
        }
    }
}

/// Items and metadata produced by one extractor run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    /// Raw change items, uncategorized
    pub items: Vec<ExtractedItem>,
    /// Extraction metadata
    pub metadata: ExtractionMetadata,
}
