//! Cached repository review
//!
//! Ties the content source, the assessment engine and the cache together.
//!
//! 1. Resolve the repository to its commit sha and reviewable files
//! 2. Return the stored review if `repo_<sha>` exists, untouched
//! 3. Otherwise review each file (cache hit or assess-and-store)
//! 4. Concatenate the file assessments and aggregate them
//! 5. Store the review under `repo_<sha>` and return it
//!
//! A repository state is therefore aggregated at most once for the lifetime
//! of the cache, apart from concurrent first requests racing each other.

pub mod aggregate;
pub mod files;
pub mod model;
#[cfg(test)]
pub(crate) mod testing;

pub use files::{FileOutcome, FileStatus};
pub use model::{DeveloperLevel, Grade, RepoReview, RepositoryInfo, ReviewRequest};

use crate::assess::{AssessmentEngine, OpenAiEngine};
use crate::cache::{persist, CacheKey, CacheStore};
use crate::config::Config;
use crate::error::{AssessmentError, CriticError, CriticResult};
use crate::source::{ContentSource, GithubSource};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Files assessed concurrently when not configured
const DEFAULT_CONCURRENCY: usize = 4;

/// A finished review plus how it was produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRun {
    pub review: RepoReview,
    /// Served from the repository cache entry without any assessment
    pub from_cache: bool,
    /// Files whose assessment was already cached
    pub hits: usize,
    /// Files assessed during this run
    pub assessed: usize,
}

/// Review orchestrator shared by all requests
#[derive(Clone)]
pub struct Reviewer {
    store: Arc<dyn CacheStore>,
    source: Arc<dyn ContentSource>,
    engine: Arc<dyn AssessmentEngine>,
    concurrency: usize,
}

impl Reviewer {
    /// Create a reviewer from its collaborators
    pub fn new(
        store: Arc<dyn CacheStore>,
        source: Arc<dyn ContentSource>,
        engine: Arc<dyn AssessmentEngine>,
    ) -> Self {
        Self {
            store,
            source,
            engine,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Build the GitHub source and OpenAI engine from configuration
    pub fn from_config(config: &Config, store: Arc<dyn CacheStore>) -> CriticResult<Self> {
        let source = GithubSource::new(&config.github)?;
        let engine = OpenAiEngine::new(&config.openai)?;
        Ok(Self::new(store, Arc::new(source), Arc::new(engine))
            .with_concurrency(config.review.concurrency))
    }

    /// Set how many files are assessed at once
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// The shared cache store
    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    /// Where repository content comes from
    pub fn source_name(&self) -> &'static str {
        self.source.source_name()
    }

    /// What assesses the files and repositories
    pub fn engine_name(&self) -> &'static str {
        self.engine.engine_name()
    }

    /// Review a repository, returning the cached review when one exists
    pub async fn review(&self, request: &ReviewRequest) -> CriticResult<RepoReview> {
        Ok(self.review_run(request).await?.review)
    }

    /// Like [`Reviewer::review`], also reporting cache usage
    pub async fn review_run(&self, request: &ReviewRequest) -> CriticResult<ReviewRun> {
        let coordinate = request.coordinate()?;
        let snapshot = self.source.resolve(&coordinate).await?;
        let repo_key = CacheKey::repo(&snapshot.identity);

        if let Some(review) = self.cached_review(&repo_key).await? {
            info!("Serving cached review for {} at {}", coordinate, snapshot.identity);
            return Ok(ReviewRun {
                review,
                from_cache: true,
                hits: 0,
                assessed: 0,
            });
        }

        let mut files = snapshot.files;
        files.sort_by(|a, b| a.name.cmp(&b.name));
        info!(
            "Reviewing {} files of {} at {}",
            files.len(),
            coordinate,
            snapshot.identity
        );

        let outcomes = files::review_files(
            &self.store,
            self.engine.as_ref(),
            &request.task_requirements,
            &files,
            self.concurrency,
        )
        .await?;
        check_outcomes(&outcomes)?;

        let hits = outcomes
            .iter()
            .filter(|o| o.status == FileStatus::Hit)
            .count();
        let assessed = outcomes.len() - hits;
        let keys: Vec<CacheKey> = outcomes.into_iter().map(|o| o.key).collect();

        let reviews = aggregate::collect_reviews(self.store.as_ref(), &keys).await?;
        let assessment = self
            .engine
            .assess_repository(&reviews)
            .await
            .map_err(|e| CriticError::assessment("repository", e))?;

        let file_names = files.into_iter().map(|f| f.name).collect();
        let review = aggregate::build_review(
            assessment,
            request.developer_level,
            &snapshot.identity,
            file_names,
        );
        persist(&self.store, repo_key, review.to_record()?).await?;
        debug!("Stored review for {}", snapshot.identity);

        Ok(ReviewRun {
            review,
            from_cache: false,
            hits,
            assessed,
        })
    }

    /// Load a stored review; a record that no longer parses is an error
    async fn cached_review(&self, key: &CacheKey) -> CriticResult<Option<RepoReview>> {
        if !self.store.exists(key).await? {
            return Ok(None);
        }
        let Some(record) = self.store.get(key).await? else {
            return Ok(None);
        };
        RepoReview::from_record(&record)
            .map(Some)
            .map_err(|e| CriticError::CorruptRecord {
                key: key.to_string(),
                reason: e.to_string(),
            })
    }
}

/// Refuse to aggregate over a partial file set.
///
/// Successful files are already cached, so a retry only redoes the failures.
/// A rate limit anywhere is reported as such so callers know to back off.
fn check_outcomes(outcomes: &[FileOutcome]) -> CriticResult<()> {
    let failed: Vec<&FileOutcome> = outcomes.iter().filter(|o| o.is_failed()).collect();
    if failed.is_empty() {
        return Ok(());
    }
    warn!("{} of {} files failed assessment", failed.len(), outcomes.len());

    let rate_limited = failed
        .iter()
        .find(|o| o.status == FileStatus::Failed(AssessmentError::RateLimited));
    if let Some(outcome) = rate_limited {
        return Err(CriticError::assessment(
            outcome.name.clone(),
            AssessmentError::RateLimited,
        ));
    }

    Err(CriticError::IncompleteReview {
        failed: failed.len(),
        total: outcomes.len(),
    })
}
