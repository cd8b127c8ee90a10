//! Repository-level aggregation
//!
//! Reads back the cached file assessments in pipeline order and joins them
//! into the text handed to the engine's aggregation step.

use crate::assess::RepositoryAssessment;
use crate::cache::{CacheKey, CacheStore};
use crate::error::CriticResult;
use crate::review::model::{DeveloperLevel, RepoReview, RepositoryInfo};
use futures_util::future::try_join_all;

/// Written after every file assessment in the aggregation input
pub const SEPARATOR: &str = "--";

/// Concatenate the stored assessments for `keys`, in order.
///
/// A key with no stored value contributes an empty string.
pub async fn collect_reviews(store: &dyn CacheStore, keys: &[CacheKey]) -> CriticResult<String> {
    let values = try_join_all(keys.iter().map(|key| store.get(key))).await?;

    let mut all = String::new();
    for value in values {
        all.push_str(value.as_deref().unwrap_or_default());
        all.push_str(SEPARATOR);
    }
    Ok(all)
}

/// Assemble the final review from the engine's summary
pub fn build_review(
    assessment: RepositoryAssessment,
    level: DeveloperLevel,
    identity: &str,
    file_names: Vec<String>,
) -> RepoReview {
    RepoReview {
        message: assessment.message,
        level,
        grade: assessment.grade,
        repository: RepositoryInfo {
            repository_hash: identity.to_string(),
        },
        file_names,
    }
}
