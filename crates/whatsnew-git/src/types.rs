//! Git types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Information about a git commit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitInfo {
    /// Commit hash (full)
    pub hash: String,
    /// Short hash (first 7 characters)
    pub short_hash: String,
    /// Commit message (first line)
    pub message: String,
    /// Message body after the subject line
    pub body: Option<String>,
    /// Author name
    pub author: String,
    /// Commit timestamp
    pub timestamp: DateTime<Utc>,
    /// Number of parents
    pub parent_count: usize,
}

impl CommitInfo {
    /// Create a new CommitInfo
    pub fn new(
        hash: impl Into<String>,
        message: impl Into<String>,
        author: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let hash = hash.into();
        let short_hash = hash.chars().take(7).collect();

        Self {
            hash,
            short_hash,
            message: message.into(),
            body: None,
            author: author.into(),
            timestamp,
            parent_count: 1,
        }
    }

    /// Set the commit body, ignoring blank bodies
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        let body = body.into();
        self.body = if body.trim().is_empty() {
            None
        } else {
            Some(body)
        };
        self
    }

    /// Set the parent count
    pub fn with_parent_count(mut self, parent_count: usize) -> Self {
        self.parent_count = parent_count;
        self
    }

    /// Get the full message including body
    pub fn full_message(&self) -> String {
        match &self.body {
            Some(body) => format!("{}\n\n{}", self.message, body),
            None => self.message.clone(),
        }
    }

    /// Whether this is a merge commit
    pub fn is_merge(&self) -> bool {
        self.parent_count > 1
    }
}

/// Information about a git tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagInfo {
    /// Tag name
    pub name: String,
    /// Commit hash the tag points to
    pub commit_hash: String,
    /// Tag message (for annotated tags)
    pub message: Option<String>,
    /// Tagger timestamp for annotated tags, commit time otherwise
    pub timestamp: Option<DateTime<Utc>>,
    /// Extracted version from tag name
    pub version: Option<String>,
}

impl TagInfo {
    /// Create a new TagInfo
    pub fn new(name: impl Into<String>, commit_hash: impl Into<String>) -> Self {
        let name = name.into();
        let version = extract_version(&name);

        Self {
            name,
            commit_hash: commit_hash.into(),
            message: None,
            timestamp: None,
            version,
        }
    }

    /// Set the tag message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the timestamp
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Parsed semantic version, when the tag carries one
    pub fn semver(&self) -> Option<semver::Version> {
        self.version
            .as_deref()
            .and_then(|v| semver::Version::parse(v).ok())
    }
}

/// Extract version from a tag name
pub fn extract_version(tag: &str) -> Option<String> {
    // Handle common tag formats: v1.0.0, 1.0.0, package@1.0.0, package-v1.0.0
    let tag = tag.strip_prefix('v').unwrap_or(tag);

    if let Some(pos) = tag.rfind('@') {
        let version_part = &tag[pos + 1..];
        let version = version_part.strip_prefix('v').unwrap_or(version_part);
        if looks_like_version(version) {
            return Some(version.to_string());
        }
    }

    if let Some(pos) = tag.rfind("-v") {
        let version = &tag[pos + 2..];
        if looks_like_version(version) {
            return Some(version.to_string());
        }
    }

    if looks_like_version(tag) {
        return Some(tag.to_string());
    }

    None
}

/// Check if a string looks like a semantic version
fn looks_like_version(s: &str) -> bool {
    let parts: Vec<&str> = s.split('.').collect();
    if parts.len() < 2 {
        return false;
    }

    parts[0].parse::<u64>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_version() {
        assert_eq!(extract_version("v1.0.0"), Some("1.0.0".to_string()));
        assert_eq!(extract_version("1.0.0"), Some("1.0.0".to_string()));
        assert_eq!(extract_version("package@1.0.0"), Some("1.0.0".to_string()));
        assert_eq!(extract_version("package@v1.0.0"), Some("1.0.0".to_string()));
        assert_eq!(extract_version("pkg-v2.0.0"), Some("2.0.0".to_string()));
        assert_eq!(extract_version("not-a-version"), None);
    }

    #[test]
    fn test_commit_info() {
        let commit = CommitInfo::new("abc1234567890", "feat: add feature", "Author", Utc::now())
            .with_body("  \n");
        assert_eq!(commit.short_hash, "abc1234");
        assert!(commit.body.is_none());
        assert_eq!(commit.full_message(), "feat: add feature");
        assert!(!commit.is_merge());
    }

    #[test]
    fn test_tag_semver() {
        let tag = TagInfo::new("v1.2.3", "abc");
        assert_eq!(tag.semver(), Some(semver::Version::new(1, 2, 3)));
        assert!(TagInfo::new("nightly", "abc").semver().is_none());
    }
}
