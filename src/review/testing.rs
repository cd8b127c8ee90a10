//! In-memory collaborators for exercising the review pipelines

use crate::assess::{AssessmentEngine, RepositoryAssessment};
use crate::cache::{CacheKey, CacheStore};
use crate::error::{AssessmentError, CriticError, CriticResult};
use crate::review::model::Grade;
use crate::source::{ContentSource, FileRecord, RepositoryCoordinate, RepositorySnapshot};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub struct FakeSource {
    pub snapshot: RepositorySnapshot,
    pub calls: AtomicUsize,
}

impl FakeSource {
    pub fn new(identity: &str, files: &[(&str, &str, &str)]) -> Self {
        let files = files
            .iter()
            .map(|(name, fingerprint, content)| FileRecord {
                name: name.to_string(),
                locator: format!("https://example.test/{name}"),
                fingerprint: fingerprint.to_string(),
                content: Ok(content.to_string()),
            })
            .collect();
        Self {
            snapshot: RepositorySnapshot {
                identity: identity.to_string(),
                files,
            },
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ContentSource for FakeSource {
    async fn resolve(
        &self,
        _coordinate: &RepositoryCoordinate,
    ) -> CriticResult<RepositorySnapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.snapshot.clone())
    }

    fn source_name(&self) -> &'static str {
        "fake source"
    }
}

/// Echoes file content back as its review
#[derive(Default)]
pub struct FakeEngine {
    pub file_calls: AtomicUsize,
    pub repo_calls: AtomicUsize,
    pub seen_contents: Mutex<Vec<String>>,
    pub seen_reviews: Mutex<Vec<String>>,
    pub fail_file: Option<(&'static str, AssessmentError)>,
    pub fail_repository: Option<AssessmentError>,
}

#[async_trait]
impl AssessmentEngine for FakeEngine {
    async fn assess_file(
        &self,
        content: &str,
        _requirements: &str,
    ) -> Result<String, AssessmentError> {
        self.file_calls.fetch_add(1, Ordering::SeqCst);
        self.seen_contents.lock().unwrap().push(content.to_string());
        if let Some((marker, err)) = &self.fail_file {
            if content.contains(marker) {
                return Err(err.clone());
            }
        }
        Ok(format!("review of {content}"))
    }

    async fn assess_repository(
        &self,
        reviews: &str,
    ) -> Result<RepositoryAssessment, AssessmentError> {
        self.repo_calls.fetch_add(1, Ordering::SeqCst);
        self.seen_reviews.lock().unwrap().push(reviews.to_string());
        if let Some(err) = &self.fail_repository {
            return Err(err.clone());
        }
        Ok(RepositoryAssessment {
            message: "Solid".to_string(),
            grade: Grade::new(4),
        })
    }

    fn engine_name(&self) -> &'static str {
        "fake engine"
    }
}

/// A store whose backend has gone away
pub struct FailingStore;

#[async_trait]
impl CacheStore for FailingStore {
    async fn exists(&self, key: &CacheKey) -> CriticResult<bool> {
        Err(CriticError::store("exists", key.to_string(), "connection refused"))
    }

    async fn get(&self, key: &CacheKey) -> CriticResult<Option<String>> {
        Err(CriticError::store("get", key.to_string(), "connection refused"))
    }

    async fn set(&self, key: &CacheKey, _value: &str) -> CriticResult<()> {
        Err(CriticError::store("set", key.to_string(), "connection refused"))
    }

    async fn ping(&self) -> CriticResult<()> {
        Err(CriticError::store("ping", "", "connection refused"))
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }
}

pub fn encoded(text: &str) -> String {
    STANDARD.encode(text)
}
