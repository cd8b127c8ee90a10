//! Cache key derivation
//!
//! Keys are pure functions of content fingerprints. Same inputs always give
//! the byte-identical key; the file and repository namespaces are kept apart
//! by their prefixes and by going through [`CacheKey`] rather than raw strings.

use std::fmt;

const FILE_PREFIX: &str = "file_";
const REPO_PREFIX: &str = "repo_";

/// A key in the shared review cache
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Assessment of a single file at a given content fingerprint
    File { name: String, fingerprint: String },
    /// Aggregated review of a repository at a given commit
    Repo { identity: String },
}

impl CacheKey {
    /// Key for a file review (`file_<name>:<fingerprint>`)
    pub fn file(name: impl Into<String>, fingerprint: impl Into<String>) -> Self {
        Self::File {
            name: name.into(),
            fingerprint: fingerprint.into(),
        }
    }

    /// Key for a repository review (`repo_<identity>`)
    pub fn repo(identity: impl Into<String>) -> Self {
        Self::Repo {
            identity: identity.into(),
        }
    }

    /// Whether this key addresses a repository-level entry
    pub fn is_repo(&self) -> bool {
        matches!(self, Self::Repo { .. })
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File { name, fingerprint } => {
                write!(f, "{}{}:{}", FILE_PREFIX, name, fingerprint)
            }
            Self::Repo { identity } => write!(f, "{}{}", REPO_PREFIX, identity),
        }
    }
}
