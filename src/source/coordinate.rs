//! Repository coordinates
//!
//! Parses the GitHub links callers submit into owner, repository and an
//! optional sub-path. Anything that is not a GitHub repository link is
//! rejected here, before any network call.

use crate::error::{CriticError, CriticResult};
use std::fmt;
use url::Url;

const GITHUB_HOST: &str = "github.com";

/// Location of a repository (and optional directory inside it) on GitHub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryCoordinate {
    pub owner: String,
    pub repo: String,
    /// Sub-path inside the repository, without leading or trailing slashes
    pub path: String,
}

impl RepositoryCoordinate {
    /// Parse a link of the form `https://github.com/<owner>/<repo>[/<path>]`
    pub fn parse(link: &str) -> CriticResult<Self> {
        let invalid = || CriticError::InvalidCoordinate(link.to_string());

        let url = Url::parse(link.trim()).map_err(|_| invalid())?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str() != Some(GITHUB_HOST) {
            return Err(invalid());
        }

        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();

        let (owner, repo, rest) = match segments.as_slice() {
            [owner, repo, rest @ ..] => (*owner, *repo, rest),
            _ => return Err(invalid()),
        };
        let repo = repo.strip_suffix(".git").unwrap_or(repo);
        if repo.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            path: rest.join("/"),
        })
    }
}

impl fmt::Display for RepositoryCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)?;
        if !self.path.is_empty() {
            write!(f, "/{}", self.path)?;
        }
        Ok(())
    }
}
