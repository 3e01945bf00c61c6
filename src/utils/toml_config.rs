//! TOML-based configuration for Scriptorium
//!
//! This module provides declarative configuration for the server, the
//! Azure OpenAI chat and embedding deployments, the feedback database,
//! and the RAG pipeline via a TOML file (`scriptorium.toml`).
//!
//! # Hot Reloading
//!
//! Configuration changes are automatically detected and applied at runtime.
//! Use `ScriptoriumConfigManager` for thread-safe access to the current
//! configuration.

use arc_swap::ArcSwap;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Root configuration structure loaded from scriptorium.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptoriumConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Azure OpenAI chat deployment
    pub chat: AzureDeploymentConfig,

    /// Azure OpenAI embedding deployment
    pub embedding: AzureDeploymentConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub rag: RagConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

// ============= Azure OpenAI Deployment Configuration =============

/// Connection settings for one Azure OpenAI deployment.
///
/// The chat and embedding deployments share the same shape. The API key
/// may be given inline (`azure_api_key`) or, preferably, as the name of
/// an environment variable holding it (`azure_api_key_env`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureDeploymentConfig {
    /// Resource endpoint, e.g. "https://myresource.openai.azure.com"
    pub azure_endpoint: String,

    /// Deployment name, e.g. "gpt-4o-mini" or "text-embedding-3-small"
    pub azure_deployment: String,

    /// API version, e.g. "2024-06-01"
    pub api_version: String,

    /// API key given inline in the config file
    pub azure_api_key: Option<String>,

    /// Environment variable name containing the API key
    pub azure_api_key_env: Option<String>,
}

impl AzureDeploymentConfig {
    /// Resolve the API key from the inline value or the named env var.
    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        if let Some(ref key) = self.azure_api_key {
            if !key.trim().is_empty() {
                return Ok(key.clone());
            }
        }
        if let Some(ref env_name) = self.azure_api_key_env {
            return std::env::var(env_name)
                .map_err(|_| ConfigError::MissingEnvVar(env_name.clone()));
        }
        Err(ConfigError::ValidationError(
            "either azure_api_key or azure_api_key_env must be set".to_string(),
        ))
    }

    fn validate(&self, section: &str) -> Result<(), ConfigError> {
        if self.azure_endpoint.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "[{}] azure_endpoint must not be empty",
                section
            )));
        }
        if self.azure_deployment.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "[{}] azure_deployment must not be empty",
                section
            )));
        }
        if self.api_version.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "[{}] api_version must not be empty",
                section
            )));
        }
        self.resolve_api_key().map_err(|e| match e {
            ConfigError::ValidationError(msg) => {
                ConfigError::ValidationError(format!("[{}] {}", section, msg))
            }
            other => other,
        })?;
        Ok(())
    }
}

// ============= Database Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file for user feedback; ":memory:" is accepted
    #[serde(default = "default_feedback_path")]
    pub feedback_path: String,
}

fn default_feedback_path() -> String {
    "./data/feedback.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            feedback_path: default_feedback_path(),
        }
    }
}

// ============= RAG Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    #[serde(default = "default_top_k")]
    pub default_top_k: usize,

    #[serde(default = "default_max_top_k")]
    pub max_top_k: usize,

    /// Ask the chat model for a librarian-style summary of each ingested
    /// document and index it alongside the body chunks
    #[serde(default = "default_true")]
    pub synthesize_metadata: bool,

    /// Optional JSON snapshot file for the vector store; empty disables
    /// persistence
    #[serde(default)]
    pub snapshot_path: String,
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    200
}

fn default_top_k() -> usize {
    5
}

fn default_max_top_k() -> usize {
    10
}

fn default_true() -> bool {
    true
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            default_top_k: default_top_k(),
            max_top_k: default_max_top_k(),
            synthesize_metadata: true,
            snapshot_path: String::new(),
        }
    }
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),

    #[error("Watch error: {0}")]
    WatchError(#[from] notify::Error),
}

impl ScriptoriumConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config: ScriptoriumConfig = toml::from_str(&content)?;

        // Validate the configuration
        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration for internal consistency and env var
    /// availability
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.chat.validate("chat")?;
        self.embedding.validate("embedding")?;

        if self.rag.chunk_size == 0 {
            return Err(ConfigError::ValidationError(
                "[rag] chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.rag.chunk_overlap >= self.rag.chunk_size {
            return Err(ConfigError::ValidationError(format!(
                "[rag] chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.rag.chunk_overlap, self.rag.chunk_size
            )));
        }
        if self.rag.max_top_k == 0 {
            return Err(ConfigError::ValidationError(
                "[rag] max_top_k must be greater than zero".to_string(),
            ));
        }
        if self.rag.default_top_k == 0 || self.rag.default_top_k > self.rag.max_top_k {
            return Err(ConfigError::ValidationError(format!(
                "[rag] default_top_k ({}) must be in 1..={}",
                self.rag.default_top_k, self.rag.max_top_k
            )));
        }
        if self.database.feedback_path.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "[database] feedback_path must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

// ============= Hot Reloading Configuration Manager =============

/// Thread-safe configuration manager with hot reloading support
pub struct ScriptoriumConfigManager {
    config: Arc<ArcSwap<ScriptoriumConfig>>,
    config_path: PathBuf,
    watcher: RwLock<Option<RecommendedWatcher>>,
    reload_tx: Option<mpsc::UnboundedSender<()>>,
}

impl ScriptoriumConfigManager {
    /// Create a new configuration manager and load the initial config
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        // Convert to absolute path for reliable file watching
        let path = path.as_ref();
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(ConfigError::ReadError)?
                .join(path)
        };

        let config = ScriptoriumConfig::load(&path)?;

        Ok(Self {
            config: Arc::new(ArcSwap::from_pointee(config)),
            config_path: path,
            watcher: RwLock::new(None),
            reload_tx: None,
        })
    }

    /// Get the current configuration (lockless read)
    pub fn config(&self) -> Arc<ScriptoriumConfig> {
        self.config.load_full()
    }

    /// Manually reload the configuration from disk
    pub fn reload(&self) -> Result<(), ConfigError> {
        info!("Reloading configuration from {:?}", self.config_path);

        let new_config = ScriptoriumConfig::load(&self.config_path)?;
        self.config.store(Arc::new(new_config));

        info!("Configuration reloaded successfully");
        Ok(())
    }

    /// Start watching for configuration file changes
    pub fn start_watching(&mut self) -> Result<(), ConfigError> {
        let (tx, mut rx) = mpsc::unbounded_channel::<()>();
        self.reload_tx = Some(tx.clone());

        let config_path = self.config_path.clone();
        let config_arc = Arc::clone(&self.config);

        // Create debounced file watcher
        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        // Send reload signal (debounced in the receiver)
                        let _ = tx.send(());
                    }
                }
                Err(e) => {
                    error!("Config watcher error: {:?}", e);
                }
            }
        })?;

        // Watch the config file's parent directory
        if let Some(parent) = self.config_path.parent() {
            watcher.watch(parent, RecursiveMode::NonRecursive)?;
        }

        *self.watcher.write() = Some(watcher);

        // Spawn reload handler with debouncing
        tokio::spawn(async move {
            let mut last_reload = std::time::Instant::now();
            let debounce_duration = Duration::from_millis(500);

            while rx.recv().await.is_some() {
                // Debounce: only reload if enough time has passed
                if last_reload.elapsed() < debounce_duration {
                    continue;
                }

                // Wait a bit for file write to complete
                tokio::time::sleep(Duration::from_millis(100)).await;

                match ScriptoriumConfig::load(&config_path) {
                    Ok(new_config) => {
                        config_arc.store(Arc::new(new_config));
                        info!("Configuration hot-reloaded successfully");
                        last_reload = std::time::Instant::now();
                    }
                    Err(e) => {
                        warn!(
                            "Failed to hot-reload config: {}. Keeping previous config.",
                            e
                        );
                    }
                }
            }
        });

        info!("Configuration hot-reload watcher started");
        Ok(())
    }
}

impl Clone for ScriptoriumConfigManager {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            config_path: self.config_path.clone(),
            watcher: RwLock::new(None), // Watcher is not cloned
            reload_tx: self.reload_tx.clone(),
        }
    }
}

impl ScriptoriumConfigManager {
    /// Create a config manager directly from a config (useful for testing)
    /// This won't have file watching capabilities.
    pub fn from_config(config: ScriptoriumConfig) -> Self {
        Self {
            config: Arc::new(ArcSwap::from_pointee(config)),
            config_path: PathBuf::from("test-config.toml"),
            watcher: RwLock::new(None),
            reload_tx: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> String {
        r#"
[server]
host = "127.0.0.1"
port = 3000
log_level = "debug"

[chat]
azure_endpoint = "https://example.openai.azure.com"
azure_deployment = "gpt-4o-mini"
api_version = "2024-06-01"
azure_api_key = "inline-chat-key"

[embedding]
azure_endpoint = "https://example.openai.azure.com"
azure_deployment = "text-embedding-3-small"
api_version = "2024-06-01"
azure_api_key = "inline-embedding-key"

[database]
feedback_path = ":memory:"

[rag]
chunk_size = 1000
chunk_overlap = 200
default_top_k = 5
max_top_k = 10
"#
        .to_string()
    }

    #[test]
    fn test_parse_config() {
        let content = create_test_config();
        let config: ScriptoriumConfig = toml::from_str(&content).expect("Failed to parse config");

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.chat.azure_deployment, "gpt-4o-mini");
        assert_eq!(config.embedding.azure_deployment, "text-embedding-3-small");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_inline_api_key_resolves() {
        let content = create_test_config();
        let config: ScriptoriumConfig = toml::from_str(&content).unwrap();

        assert_eq!(config.chat.resolve_api_key().unwrap(), "inline-chat-key");
    }

    #[test]
    fn test_env_api_key_resolves() {
        // SAFETY: Tests are run single-threaded for env var safety
        unsafe {
            std::env::set_var("TEST_SCRIPTORIUM_CHAT_KEY", "env-chat-key");
        }

        let content = r#"
[chat]
azure_endpoint = "https://example.openai.azure.com"
azure_deployment = "gpt-4o-mini"
api_version = "2024-06-01"
azure_api_key_env = "TEST_SCRIPTORIUM_CHAT_KEY"

[embedding]
azure_endpoint = "https://example.openai.azure.com"
azure_deployment = "text-embedding-3-small"
api_version = "2024-06-01"
azure_api_key = "inline"
"#;

        let config: ScriptoriumConfig = toml::from_str(content).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.chat.resolve_api_key().unwrap(), "env-chat-key");
    }

    #[test]
    fn test_missing_env_var_fails_validation() {
        let content = r#"
[chat]
azure_endpoint = "https://example.openai.azure.com"
azure_deployment = "gpt-4o-mini"
api_version = "2024-06-01"
azure_api_key_env = "TEST_SCRIPTORIUM_UNSET_KEY"

[embedding]
azure_endpoint = "https://example.openai.azure.com"
azure_deployment = "text-embedding-3-small"
api_version = "2024-06-01"
azure_api_key = "inline"
"#;

        let config: ScriptoriumConfig = toml::from_str(content).unwrap();
        let result = config.validate();

        assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
    }

    #[test]
    fn test_missing_api_key_fails_validation() {
        let content = r#"
[chat]
azure_endpoint = "https://example.openai.azure.com"
azure_deployment = "gpt-4o-mini"
api_version = "2024-06-01"

[embedding]
azure_endpoint = "https://example.openai.azure.com"
azure_deployment = "text-embedding-3-small"
api_version = "2024-06-01"
azure_api_key = "inline"
"#;

        let config: ScriptoriumConfig = toml::from_str(content).unwrap();
        let result = config.validate();

        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_overlap_must_be_smaller_than_chunk_size() {
        let mut config: ScriptoriumConfig =
            toml::from_str(&create_test_config()).unwrap();
        config.rag.chunk_overlap = config.rag.chunk_size;

        let result = config.validate();

        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_top_k_bounds() {
        let mut config: ScriptoriumConfig =
            toml::from_str(&create_test_config()).unwrap();
        config.rag.default_top_k = 11;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_defaults() {
        let content = r#"
[chat]
azure_endpoint = "https://example.openai.azure.com"
azure_deployment = "gpt-4o-mini"
api_version = "2024-06-01"
azure_api_key = "k"

[embedding]
azure_endpoint = "https://example.openai.azure.com"
azure_deployment = "text-embedding-3-small"
api_version = "2024-06-01"
azure_api_key = "k"
"#;

        let config: ScriptoriumConfig = toml::from_str(content).unwrap();

        // Server defaults
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.log_level, "info");

        // Database defaults
        assert_eq!(config.database.feedback_path, "./data/feedback.db");

        // RAG defaults
        assert_eq!(config.rag.chunk_size, 1000);
        assert_eq!(config.rag.chunk_overlap, 200);
        assert_eq!(config.rag.default_top_k, 5);
        assert_eq!(config.rag.max_top_k, 10);
        assert!(config.rag.synthesize_metadata);
        assert!(config.rag.snapshot_path.is_empty());
    }

    #[test]
    fn test_config_manager_from_config() {
        let content = create_test_config();
        let config: ScriptoriumConfig = toml::from_str(&content).unwrap();

        let manager = ScriptoriumConfigManager::from_config(config.clone());
        let loaded = manager.config();

        assert_eq!(loaded.server.host, config.server.host);
        assert_eq!(loaded.server.port, config.server.port);
    }
}
