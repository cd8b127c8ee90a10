//! Cache store abstraction
//!
//! Provides a trait for the key-value operations the review pipelines need,
//! implemented by Redis for deployments and by an in-process map for
//! single-shot runs and tests.

use crate::cache::key::CacheKey;
use crate::cache::memory::MemoryStore;
use crate::cache::redis::RedisStore;
use crate::config::schema::{CacheBackend, Config};
use crate::error::{CriticError, CriticResult};
use async_trait::async_trait;
use std::sync::Arc;

/// Abstract key-value store holding cached reviews
///
/// Implementations must be safe to share across concurrent requests. No
/// locking primitive is exposed: writes are last-writer-wins.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Check whether a value exists under the key
    async fn exists(&self, key: &CacheKey) -> CriticResult<bool>;

    /// Read the value stored under the key, if any
    async fn get(&self, key: &CacheKey) -> CriticResult<Option<String>>;

    /// Store a value under the key, overwriting any previous value
    async fn set(&self, key: &CacheKey, value: &str) -> CriticResult<()>;

    /// Health check
    async fn ping(&self) -> CriticResult<()>;

    /// Release the underlying connection
    async fn close(&self) {}

    /// Get the human-readable backend name for display
    fn backend_name(&self) -> &'static str;
}

/// Open the configured store and verify it answers.
///
/// A store that cannot be reached here is fatal to startup.
pub async fn connect(config: &Config) -> CriticResult<Arc<dyn CacheStore>> {
    match config.cache.backend {
        CacheBackend::Redis => Ok(Arc::new(RedisStore::connect(&config.redis).await?)),
        CacheBackend::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}

/// Write a value on a detached task and wait for it.
///
/// If the awaiting request is dropped mid-write, the write still completes
/// so later requests find the entry.
pub async fn persist(
    store: &Arc<dyn CacheStore>,
    key: CacheKey,
    value: String,
) -> CriticResult<()> {
    let store = Arc::clone(store);
    tokio::spawn(async move { store.set(&key, &value).await })
        .await
        .map_err(|e| CriticError::Internal(format!("cache write task failed: {e}")))?
}
