//! Error types for Critic
//!
//! All modules use `CriticResult<T>` as their return type. Failures of the
//! assessment engine are carried as a typed [`AssessmentError`] so callers
//! can tell a rate limit from a malformed response.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Critic operations
pub type CriticResult<T> = Result<T, CriticError>;

/// Failure outcomes of an assessment engine call.
///
/// These are values, not panics: the pipelines inspect them to decide
/// whether a file is cached and whether an aggregate may be stored.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssessmentError {
    #[error("Rate limit reached. Please try again later.")]
    RateLimited,

    #[error("Failed to decode the assessment response: {0}")]
    Decode(String),

    #[error("Assessment failed: {0}")]
    Failed(String),
}

impl AssessmentError {
    /// Short machine-readable name of the outcome
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RateLimited => "rate_limited",
            Self::Decode(_) => "decode",
            Self::Failed(_) => "failed",
        }
    }
}

/// All errors that can occur in Critic
#[derive(Error, Debug)]
pub enum CriticError {
    // Input errors
    #[error("GitHub link is not valid. Please provide valid link to GitHub (https://github.com/owner/repository): {0}")]
    InvalidCoordinate(String),

    // Upstream retrieval errors
    #[error("Repository not found: {0}")]
    RepositoryNotFound(String),

    #[error("Access to repository denied: {0}")]
    RepositoryForbidden(String),

    #[error("GitHub request failed: {endpoint}: {reason}")]
    Upstream { endpoint: String, reason: String },

    #[error("Unexpected GitHub response from {endpoint}: {reason}")]
    UpstreamPayload { endpoint: String, reason: String },

    // Assessment errors
    #[error("Assessment of {subject} failed: {source}")]
    Assessment {
        subject: String,
        #[source]
        source: AssessmentError,
    },

    #[error("Review incomplete: {failed} of {total} files could not be assessed")]
    IncompleteReview { failed: usize, total: usize },

    // Cache store errors
    #[error("Cache store unreachable at {url}: {reason}")]
    StoreConnect { url: String, reason: String },

    #[error("Cache store operation failed: {operation} {key}: {reason}")]
    Store {
        operation: &'static str,
        key: String,
        reason: String,
    },

    #[error("Cached review under {key} is corrupt: {reason}")]
    CorruptRecord { key: String, reason: String },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Missing setting: {0}")]
    ConfigMissing(&'static str),

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CriticError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create an assessment error for the given subject (a file name or "repository")
    pub fn assessment(subject: impl Into<String>, source: AssessmentError) -> Self {
        Self::Assessment {
            subject: subject.into(),
            source,
        }
    }

    /// Create a store error for a failed operation on a key
    pub fn store(operation: &'static str, key: impl Into<String>, reason: impl ToString) -> Self {
        Self::Store {
            operation,
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Upstream { .. }
            | Self::IncompleteReview { .. }
            | Self::StoreConnect { .. }
            | Self::Store { .. } => true,
            Self::Assessment { source, .. } => matches!(source, AssessmentError::RateLimited),
            _ => false,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::StoreConnect { .. } => {
                Some("Check REDIS_HOST / REDIS_PORT or set cache.backend = \"memory\"")
            }
            Self::ConfigMissing("openai.api_key") => Some("Export OPENAI_API"),
            Self::RepositoryForbidden(_) => {
                Some("Check that the GitHub token can read the repository")
            }
            Self::Assessment { source, .. } if *source == AssessmentError::RateLimited => {
                Some("Wait and retry; files reviewed so far stay cached")
            }
            _ => None,
        }
    }
}
