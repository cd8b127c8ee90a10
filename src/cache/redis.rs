//! Redis-backed cache store
//!
//! One `ConnectionManager` is opened at startup and cloned into every
//! request; the manager multiplexes commands and reconnects on its own.
//! `close` releases the store's handle, after which every operation fails.

use crate::cache::key::CacheKey;
use crate::cache::store::CacheStore;
use crate::config::schema::RedisConfig;
use crate::error::{CriticError, CriticResult};
use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::AsyncCommands;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Shared Redis connection
pub struct RedisStore {
    /// `None` once closed
    manager: RwLock<Option<ConnectionManager>>,
    /// Connection URL with the password elided, for logs and errors
    display_url: String,
}

impl RedisStore {
    /// Connect and PING the server
    pub async fn connect(config: &RedisConfig) -> CriticResult<Self> {
        let display_url = config.display_url();
        let connect_err = |reason: String| CriticError::StoreConnect {
            url: display_url.clone(),
            reason,
        };

        let client = redis::Client::open(config.url()).map_err(|e| connect_err(e.to_string()))?;
        let manager_config = ConnectionManagerConfig::new()
            .set_number_of_retries(config.connect_retries)
            .set_connection_timeout(Duration::from_millis(config.connect_timeout_ms));
        let manager = ConnectionManager::new_with_config(client, manager_config)
            .await
            .map_err(|e| connect_err(e.to_string()))?;

        let store = Self {
            manager: RwLock::new(Some(manager)),
            display_url: display_url.clone(),
        };
        store.ping().await.map_err(|e| connect_err(e.to_string()))?;

        info!("Connected to Redis at {}", store.display_url);
        Ok(store)
    }

    /// A handle for one command, or a store error once closed
    async fn connection(
        &self,
        operation: &'static str,
        key: &str,
    ) -> CriticResult<ConnectionManager> {
        self.manager
            .read()
            .await
            .clone()
            .ok_or_else(|| CriticError::store(operation, key, "connection closed"))
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn exists(&self, key: &CacheKey) -> CriticResult<bool> {
        let key = key.to_string();
        let mut conn = self.connection("exists", &key).await?;
        let found: bool = conn
            .exists(&key)
            .await
            .map_err(|e| CriticError::store("exists", &key, e))?;
        debug!("EXISTS {} -> {}", key, found);
        Ok(found)
    }

    async fn get(&self, key: &CacheKey) -> CriticResult<Option<String>> {
        let key = key.to_string();
        let mut conn = self.connection("get", &key).await?;
        conn.get(&key)
            .await
            .map_err(|e| CriticError::store("get", &key, e))
    }

    async fn set(&self, key: &CacheKey, value: &str) -> CriticResult<()> {
        let key = key.to_string();
        let mut conn = self.connection("set", &key).await?;
        conn.set::<_, _, ()>(&key, value)
            .await
            .map_err(|e| CriticError::store("set", &key, e))?;
        debug!("SET {} ({} bytes)", key, value.len());
        Ok(())
    }

    async fn ping(&self) -> CriticResult<()> {
        let mut conn = self.connection("ping", "").await?;
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| CriticError::store("ping", "", e))?;
        if pong != "PONG" {
            return Err(CriticError::store(
                "ping",
                "",
                format!("unexpected reply {pong}"),
            ));
        }
        Ok(())
    }

    async fn close(&self) {
        // In-flight commands keep their own clones until they finish
        if self.manager.write().await.take().is_some() {
            info!("Released Redis connection to {}", self.display_url);
        }
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
