//! Configuration types

use serde::{Deserialize, Serialize};

/// Main configuration for whatsnew
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Version of the config schema
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Data source configuration
    pub sources: SourcesConfig,

    /// Quality gate configuration
    pub quality: QualityConfig,

    /// AI enhancement configuration
    pub ai: AiConfig,

    /// Source provider configuration
    pub provider: ProviderConfig,
}

/// Configuration of every data source
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Release body source
    pub release: SourceConfig,

    /// Changelog file source
    pub changelog: ChangelogSourceConfig,

    /// Commit history source
    pub commits: CommitSourceConfig,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            release: SourceConfig {
                enabled: true,
                priority: 1,
                min_confidence: 0.7,
            },
            changelog: ChangelogSourceConfig::default(),
            commits: CommitSourceConfig::default(),
        }
    }
}

/// Common source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Whether the source participates in the pipeline
    pub enabled: bool,

    /// Lower values are tried first
    pub priority: u32,

    /// Minimum confidence for a result to be accepted as primary
    pub min_confidence: f64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            priority: 1,
            min_confidence: 0.7,
        }
    }
}

/// Changelog file source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogSourceConfig {
    /// Whether the source participates in the pipeline
    pub enabled: bool,

    /// Lower values are tried first
    pub priority: u32,

    /// Minimum confidence for a result to be accepted as primary
    pub min_confidence: f64,

    /// Candidate changelog paths, checked in order
    pub paths: Vec<String>,
}

impl Default for ChangelogSourceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            priority: 2,
            min_confidence: 0.6,
            paths: default_changelog_paths(),
        }
    }
}

/// Commit history source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitSourceConfig {
    /// Whether the source participates in the pipeline
    pub enabled: bool,

    /// Lower values are tried first
    pub priority: u32,

    /// Minimum confidence for a result to be accepted
    pub min_confidence: f64,

    /// Upper bound on commits inspected per comparison
    pub max_commits: usize,
}

impl Default for CommitSourceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            priority: 3,
            min_confidence: 0.0,
            max_commits: 250,
        }
    }
}

/// Quality gate settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Results below this confidence are flagged for AI enhancement
    pub confidence_threshold: f64,

    /// Items scoring below this are dropped by the final filter
    pub min_item_score: f64,

    /// Shortest item text the default validator accepts
    pub min_text_length: usize,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.6,
            min_item_score: 0.25,
            min_text_length: 3,
        }
    }
}

/// AI enhancement settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Whether AI enhancement may run at all
    pub enabled: bool,

    /// Upper bound on a single extraction call
    pub timeout_secs: u64,

    /// Confidence assigned to AI-assisted results at minimum
    pub confidence_floor: f64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            timeout_secs: 60,
            confidence_floor: 0.8,
        }
    }
}

/// Source provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider kind (local, github)
    pub kind: String,

    /// API base URL for hosted providers
    pub api_url: String,

    /// Environment variable holding the API token
    pub token_env: String,

    /// HTTP request timeout
    pub timeout_secs: u64,

    /// Maximum number of tags listed when resolving releases
    pub tag_limit: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: "local".to_string(),
            api_url: "https://api.github.com".to_string(),
            token_env: "GITHUB_TOKEN".to_string(),
            timeout_secs: 30,
            tag_limit: 30,
        }
    }
}

/// Changelog file names probed when none are configured
pub fn default_changelog_paths() -> Vec<String> {
    [
        "CHANGELOG.md",
        "changelog.md",
        "CHANGES.md",
        "HISTORY.md",
        "NEWS.md",
        "RELEASES.md",
        "docs/CHANGELOG.md",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_source_priorities() {
        let sources = SourcesConfig::default();
        assert!(sources.release.priority < sources.changelog.priority);
        assert!(sources.changelog.priority < sources.commits.priority);
        assert_eq!(sources.commits.min_confidence, 0.0);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: Config =
            serde_yaml::from_str("quality:\n  confidence_threshold: 0.5\n").unwrap();
        assert_eq!(config.quality.confidence_threshold, 0.5);
        assert_eq!(config.quality.min_item_score, 0.25);
        assert_eq!(config.provider.kind, "local");
        assert!(!config.sources.changelog.paths.is_empty());
    }
}
