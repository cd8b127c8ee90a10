//! GitHub REST content source
//!
//! Resolves the default branch to its head commit first, then walks the
//! contents API depth-first at that commit and downloads every file. The
//! identity and the file list therefore always describe the same commit.

use crate::config::schema::GithubConfig;
use crate::error::{CriticError, CriticResult};
use crate::source::{ContentSource, FileRecord, RepositoryCoordinate, RepositorySnapshot};
use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Parallel file downloads per repository
const DOWNLOAD_CONCURRENCY: usize = 8;

/// One entry of a contents listing
#[derive(Debug, Clone, Deserialize)]
struct ContentEntry {
    path: String,
    sha: String,
    url: String,
    #[serde(rename = "type")]
    kind: String,
}

/// The contents endpoint answers with an array for directories and an
/// object when the path names a single file
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Listing {
    Directory(Vec<ContentEntry>),
    File(ContentEntry),
}

#[derive(Debug, Deserialize)]
struct FileBody {
    content: String,
}

#[derive(Debug, Deserialize)]
struct RepositoryMeta {
    default_branch: String,
}

#[derive(Debug, Deserialize)]
struct Commit {
    sha: String,
}

/// Content source backed by the GitHub REST API
#[derive(Debug, Clone)]
pub struct GithubSource {
    client: reqwest::Client,
    api_url: String,
}

impl GithubSource {
    /// Create a new source from configuration
    pub fn new(config: &GithubConfig) -> CriticResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        if let Some(token) = config.token.as_deref() {
            let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
                CriticError::ConfigInvalid {
                    path: "github.token".into(),
                    reason: "token contains invalid header characters".to_string(),
                }
            })?;
            headers.insert(header::AUTHORIZATION, value);
        } else {
            warn!("No GitHub token configured, requests are unauthenticated");
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("critic/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| CriticError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    fn repo_url(&self, coordinate: &RepositoryCoordinate) -> String {
        format!("{}/repos/{}/{}", self.api_url, coordinate.owner, coordinate.repo)
    }

    /// GET a JSON document, mapping HTTP failures onto the error taxonomy
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        coordinate: &RepositoryCoordinate,
    ) -> CriticResult<T> {
        let upstream = |reason: String| CriticError::Upstream {
            endpoint: url.to_string(),
            reason,
        };

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| upstream(e.to_string()))?;

        match resp.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => {
                return Err(CriticError::RepositoryNotFound(coordinate.to_string()))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(CriticError::RepositoryForbidden(coordinate.to_string()))
            }
            status => {
                let body = resp.text().await.unwrap_or_default();
                return Err(upstream(format!("HTTP {status}: {body}")));
            }
        }

        resp.json::<T>()
            .await
            .map_err(|e| CriticError::UpstreamPayload {
                endpoint: url.to_string(),
                reason: e.to_string(),
            })
    }

    /// Head commit of the repository's default branch
    async fn head_commit(&self, coordinate: &RepositoryCoordinate) -> CriticResult<String> {
        let repo_url = self.repo_url(coordinate);
        let meta: RepositoryMeta = self.get_json(&repo_url, coordinate).await?;
        let commit_url = format!("{}/commits/{}", repo_url, meta.default_branch);
        let commit: Commit = self.get_json(&commit_url, coordinate).await?;
        debug!("{} is at {} on {}", coordinate, commit.sha, meta.default_branch);
        Ok(commit.sha)
    }

    /// List every file below the coordinate's sub-path at the given commit
    async fn list_files(
        &self,
        coordinate: &RepositoryCoordinate,
        commit: &str,
    ) -> CriticResult<Vec<ContentEntry>> {
        let repo_url = self.repo_url(coordinate);
        let mut stack = vec![coordinate.path.clone()];
        let mut files = Vec::new();

        while let Some(current) = stack.pop() {
            let url = format!("{}/contents/{}?ref={}", repo_url, current, commit);
            let entries = match self.get_json::<Listing>(&url, coordinate).await? {
                Listing::Directory(entries) => entries,
                Listing::File(entry) => vec![entry],
            };

            for entry in entries {
                match entry.kind.as_str() {
                    "file" => files.push(entry),
                    "dir" => stack.push(entry.path),
                    _ => debug!("Skipping {} ({})", entry.path, entry.kind),
                }
            }
        }

        debug!("Found {} files in {}", files.len(), coordinate);
        Ok(files)
    }

    /// Download a file's encoded content
    async fn fetch_content(&self, entry: &ContentEntry) -> Result<String, String> {
        let result = async {
            self.client
                .get(&entry.url)
                .send()
                .await?
                .error_for_status()?
                .json::<FileBody>()
                .await
        }
        .await;

        result.map(|body| body.content).map_err(|e| {
            warn!("Failed to download {}: {}", entry.path, e);
            e.to_string()
        })
    }
}

#[async_trait]
impl ContentSource for GithubSource {
    async fn resolve(
        &self,
        coordinate: &RepositoryCoordinate,
    ) -> CriticResult<RepositorySnapshot> {
        let identity = self.head_commit(coordinate).await?;
        let entries = self.list_files(coordinate, &identity).await?;

        let files: Vec<FileRecord> = stream::iter(entries)
            .map(|entry| async move {
                let content = self.fetch_content(&entry).await;
                FileRecord {
                    name: entry.path,
                    locator: entry.url,
                    fingerprint: entry.sha,
                    content,
                }
            })
            .buffered(DOWNLOAD_CONCURRENCY)
            .collect()
            .await;

        debug!("Resolved {} at {}", coordinate, identity);
        Ok(RepositorySnapshot { identity, files })
    }

    fn source_name(&self) -> &'static str {
        "github"
    }
}
