//! Per-file review pipeline
//!
//! Each file is looked up under its file key; misses are decoded, assessed
//! and stored. A failure on one file is recorded in its outcome and never
//! stops the rest of the batch. Cache store errors do propagate.
//!
//! Only a successful assessment of the file's real content is ever stored:
//! a file whose download failed is reported as unavailable, since the key
//! names its fingerprint and entries are never rewritten.

use crate::assess::AssessmentEngine;
use crate::cache::{persist, CacheKey, CacheStore};
use crate::error::{AssessmentError, CriticResult};
use crate::source::FileRecord;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use futures_util::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Content assessed in place of a file that could not be decoded
pub const DECODE_FAILED: &str = "Error when trying to decode file content";

/// What happened to one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// Assessment already cached, nothing computed
    Hit,
    /// Assessed and stored now
    Assessed,
    /// Assessment failed; nothing stored
    Failed(AssessmentError),
    /// Content could not be downloaded; nothing assessed or stored
    Unavailable(String),
}

/// Per-file result, in input order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub name: String,
    pub key: CacheKey,
    pub status: FileStatus,
}

impl FileOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, FileStatus::Failed(_) | FileStatus::Unavailable(_))
    }
}

/// Decode GitHub's base64 payload (with embedded line breaks) into text
pub fn decode_content(raw: &str) -> Option<String> {
    let compact: String = raw.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD.decode(compact).ok()?;
    String::from_utf8(bytes).ok()
}

/// Review every file, returning one outcome per input file in input order.
///
/// Files sharing a key are assessed once; later occurrences share the
/// first one's outcome. Up to `concurrency` distinct keys are in flight.
pub async fn review_files(
    store: &Arc<dyn CacheStore>,
    engine: &dyn AssessmentEngine,
    requirements: &str,
    files: &[FileRecord],
    concurrency: usize,
) -> CriticResult<Vec<FileOutcome>> {
    let keys: Vec<CacheKey> = files
        .iter()
        .map(|f| CacheKey::file(&f.name, &f.fingerprint))
        .collect();

    // First occurrence of each key
    let mut first_index: HashMap<&CacheKey, usize> = HashMap::new();
    for (i, key) in keys.iter().enumerate() {
        first_index.entry(key).or_insert(i);
    }
    let mut unique: Vec<usize> = first_index.values().copied().collect();
    unique.sort_unstable();

    let statuses: Vec<CriticResult<(usize, FileStatus)>> = stream::iter(unique)
        .map(|i| {
            let key = &keys[i];
            let file = &files[i];
            async move {
                review_file(store, engine, requirements, file, key)
                    .await
                    .map(|status| (i, status))
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut by_index: HashMap<usize, FileStatus> = HashMap::new();
    for result in statuses {
        let (i, status) = result?;
        by_index.insert(i, status);
    }

    let outcomes = files
        .iter()
        .zip(keys.iter())
        .map(|(file, key)| {
            let status = by_index
                .get(&first_index[key])
                .cloned()
                .unwrap_or(FileStatus::Hit);
            FileOutcome {
                name: file.name.clone(),
                key: key.clone(),
                status,
            }
        })
        .collect();

    Ok(outcomes)
}

async fn review_file(
    store: &Arc<dyn CacheStore>,
    engine: &dyn AssessmentEngine,
    requirements: &str,
    file: &FileRecord,
    key: &CacheKey,
) -> CriticResult<FileStatus> {
    if store.exists(key).await? {
        debug!("Cache hit for {}", key);
        return Ok(FileStatus::Hit);
    }
    debug!("Cache miss for {}", key);

    let raw = match &file.content {
        Ok(raw) => raw,
        Err(reason) => {
            warn!("Content of {} unavailable: {}", file.name, reason);
            return Ok(FileStatus::Unavailable(reason.clone()));
        }
    };
    let content = decode_content(raw).unwrap_or_else(|| {
        warn!("Could not decode {}, assessing placeholder", file.name);
        DECODE_FAILED.to_string()
    });

    match engine.assess_file(&content, requirements).await {
        Ok(review) => {
            persist(store, key.clone(), review).await?;
            Ok(FileStatus::Assessed)
        }
        Err(e) => {
            warn!(kind = e.kind(), "Assessment of {} failed: {}", file.name, e);
            Ok(FileStatus::Failed(e))
        }
    }
}
