//! Pipeline error types

use thiserror::Error;
use whatsnew_core::GitError;

/// Errors raised by providers, sources and the pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Provider could not serve a request
    #[error("Provider error: {0}")]
    Provider(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from a remote API
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Local git failure
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    /// AI-assisted extraction failed
    #[error("AI extraction failed: {0}")]
    Ai(String),

    /// Operation timed out
    #[error("Operation timed out after {0} seconds")]
    Timeout(u64),

    /// No release information exists for the repository
    #[error("No release information found for {owner}/{repo}")]
    NotFound { owner: String, repo: String },

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    /// Create a provider error
    pub fn provider<S: Into<String>>(msg: S) -> Self {
        Self::Provider(msg.into())
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
