//! Configuration management for Critic

pub mod schema;

pub use schema::Config;

use crate::error::{CriticError, CriticResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Environment variables read on top of the config file
pub mod env {
    pub const GITHUB_TOKEN: &str = "GITHUB_ACCESS_TOKEN";
    pub const OPENAI_KEY: &str = "OPENAI_API";
    pub const REDIS_HOST: &str = "REDIS_HOST";
    pub const REDIS_PORT: &str = "REDIS_PORT";
    pub const BIND: &str = "CRITIC_BIND";
}

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("critic")
            .join("config.toml")
    }

    /// Load configuration, falling back to defaults if the file does not exist
    pub async fn load(&self) -> CriticResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path).await
    }

    /// Load configuration and apply environment overrides
    pub async fn load_with_env(&self) -> CriticResult<Config> {
        let mut config = self.load().await?;
        apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub async fn load_from_file(&self, path: &Path) -> CriticResult<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| CriticError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| CriticError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Save configuration to file
    pub async fn save(&self, config: &Config) -> CriticResult<()> {
        self.ensure_config_dir().await?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            CriticError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Ensure the config directory exists
    async fn ensure_config_dir(&self) -> CriticResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| CriticError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Overlay environment settings onto a loaded config.
///
/// `lookup` resolves a variable name; empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> CriticResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(token) = get(env::GITHUB_TOKEN) {
        config.github.token = Some(token);
    }
    if let Some(key) = get(env::OPENAI_KEY) {
        config.openai.api_key = Some(key);
    }
    if let Some(host) = get(env::REDIS_HOST) {
        config.redis.host = host;
    }
    if let Some(port) = get(env::REDIS_PORT) {
        config.redis.port = port.trim().parse().map_err(|_| CriticError::ConfigInvalid {
            path: PathBuf::from(format!("${}", env::REDIS_PORT)),
            reason: format!("'{}' is not a valid port", port),
        })?;
    }
    if let Some(bind) = get(env::BIND) {
        config.server.bind = bind;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[tokio::test]
    async fn load_default_when_missing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nonexistent.toml");
        let manager = ConfigManager::with_path(path);

        let config = manager.load().await.unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:8000");
    }

    #[tokio::test]
    async fn save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");
        let manager = ConfigManager::with_path(path);

        let mut config = Config::default();
        config.redis.host = "redis.test".to_string();

        manager.save(&config).await.unwrap();
        let loaded = manager.load().await.unwrap();

        assert_eq!(loaded.redis.host, "redis.test");
    }

    #[tokio::test]
    async fn invalid_file_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[redis]\nport = \"not a number\"\n").unwrap();

        let err = ConfigManager::with_path(path.clone()).load().await.unwrap_err();
        match err {
            CriticError::ConfigInvalid { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = Config::default();
        apply_env_overrides(
            &mut config,
            lookup(&[
                ("GITHUB_ACCESS_TOKEN", "ghp_x"),
                ("OPENAI_API", "sk-x"),
                ("REDIS_HOST", "redis"),
                ("REDIS_PORT", "6380"),
            ]),
        )
        .unwrap();

        assert_eq!(config.github.token.as_deref(), Some("ghp_x"));
        assert_eq!(config.openai.api_key.as_deref(), Some("sk-x"));
        assert_eq!(config.redis.host, "redis");
        assert_eq!(config.redis.port, 6380);
    }

    #[test]
    fn env_empty_values_ignored() {
        let mut config = Config::default();
        apply_env_overrides(&mut config, lookup(&[("REDIS_HOST", "  ")])).unwrap();
        assert_eq!(config.redis.host, "localhost");
    }

    #[test]
    fn env_bad_port_rejected() {
        let mut config = Config::default();
        let err = apply_env_overrides(&mut config, lookup(&[("REDIS_PORT", "lots")])).unwrap_err();
        assert!(err.to_string().contains("not a valid port"));
    }

    #[tokio::test]
    #[serial]
    async fn load_with_env_reads_process_env() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[redis]\nhost = \"from-file\"\n").unwrap();

        std::env::set_var(env::REDIS_HOST, "from-env");
        std::env::set_var(env::BIND, "127.0.0.1:9100");
        let loaded = ConfigManager::with_path(path).load_with_env().await;
        std::env::remove_var(env::REDIS_HOST);
        std::env::remove_var(env::BIND);

        let config = loaded.unwrap();
        assert_eq!(config.redis.host, "from-env");
        assert_eq!(config.server.bind, "127.0.0.1:9100");
    }
}
