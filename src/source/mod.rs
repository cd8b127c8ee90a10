//! Repository content sources
//!
//! A content source turns a repository coordinate into the repository's
//! content fingerprint and the files of the requested tree, each with its
//! own fingerprint and raw (still encoded) content. Every file is eligible;
//! content that turns out not to be text is handled by the file pipeline.

pub mod coordinate;
pub mod github;

pub use coordinate::RepositoryCoordinate;
pub use github::GithubSource;

use crate::error::CriticResult;
use async_trait::async_trait;

/// A file as delivered by a content source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Full path inside the repository
    pub name: String,
    /// Where the content can be fetched again
    pub locator: String,
    /// Content fingerprint (git blob sha)
    pub fingerprint: String,
    /// Raw content as delivered (base64 for GitHub), or why it could not be
    /// downloaded
    pub content: Result<String, String>,
}

/// State of a repository at evaluation time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySnapshot {
    /// Content fingerprint of the whole repository (commit sha)
    pub identity: String,
    /// Every file in the requested tree
    pub files: Vec<FileRecord>,
}

/// Abstract repository content provider
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Resolve a coordinate to the repository identity and its files
    async fn resolve(
        &self,
        coordinate: &RepositoryCoordinate,
    ) -> CriticResult<RepositorySnapshot>;

    /// Get the human-readable source name for display
    fn source_name(&self) -> &'static str;
}
