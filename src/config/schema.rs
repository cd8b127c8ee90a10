//! Configuration schema for Critic
//!
//! Configuration is stored at `~/.config/critic/config.toml`

use serde::{Deserialize, Serialize};

/// Placeholder printed instead of secrets
const REDACTED: &str = "***";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// HTTP server settings
    pub server: ServerConfig,

    /// Cache backend selection
    pub cache: CacheConfig,

    /// Redis connection settings
    pub redis: RedisConfig,

    /// GitHub API settings
    pub github: GithubConfig,

    /// OpenAI API settings
    pub openai: OpenAiConfig,

    /// Review pipeline settings
    pub review: ReviewConfig,
}

impl Config {
    /// Copy of the configuration with secrets replaced, safe to print
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        let hide = |value: &mut Option<String>| {
            if value.is_some() {
                *value = Some(REDACTED.to_string());
            }
        };
        hide(&mut config.redis.password);
        hide(&mut config.github.token);
        hide(&mut config.openai.api_key);
        config
    }
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8000".to_string(),
        }
    }
}

/// Which store holds cached reviews
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Shared Redis server
    #[default]
    Redis,
    /// Process-local map, lost on exit
    Memory,
}

/// Cache configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Store backend (default: redis)
    pub backend: CacheBackend,
}

/// Redis connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    pub host: String,

    pub port: u16,

    /// ACL username (optional)
    pub username: Option<String>,

    /// Password (optional)
    pub password: Option<String>,

    /// Database index
    pub db: u32,

    /// Reconnect attempts while establishing the connection
    pub connect_retries: usize,

    /// Timeout for a single connection attempt in milliseconds
    pub connect_timeout_ms: u64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            username: None,
            password: None,
            db: 0,
            connect_retries: 2,
            connect_timeout_ms: 2000,
        }
    }
}

impl RedisConfig {
    /// Connection URL including credentials
    pub fn url(&self) -> String {
        self.build_url(self.password.as_deref())
    }

    /// Connection URL with the password elided
    pub fn display_url(&self) -> String {
        self.build_url(self.password.as_ref().map(|_| REDACTED))
    }

    fn build_url(&self, password: Option<&str>) -> String {
        let auth = match (self.username.as_deref(), password) {
            (Some(user), Some(pass)) => format!("{}:{}@", user, pass),
            (None, Some(pass)) => format!(":{}@", pass),
            (Some(user), None) => format!("{}@", user),
            (None, None) => String::new(),
        };
        format!("redis://{}{}:{}/{}", auth, self.host, self.port, self.db)
    }
}

/// GitHub API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    /// REST API base URL (for GitHub Enterprise)
    pub api_url: String,

    /// Access token used as a bearer credential
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            token: None,
            timeout_secs: 30,
        }
    }
}

/// OpenAI API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// API base URL
    pub api_url: String,

    /// API key
    pub api_key: Option<String>,

    /// Chat model used for both file and repository assessments
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4-turbo".to_string(),
            timeout_secs: 120,
        }
    }
}

/// Review pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Files assessed concurrently within one request
    pub concurrency: usize,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self { concurrency: 4 }
    }
}
