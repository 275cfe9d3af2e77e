//! Server configuration loading.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Store backend selection.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// "memory" or "redis"
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Redis connection URL, required for the redis backend
    #[serde(default)]
    pub connection_url: Option<String>,
    /// Key prefix for all Redis keys
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            connection_url: None,
            key_prefix: default_key_prefix(),
        }
    }
}

/// Full server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub store: StoreConfig,
    /// Actions handed out per pull when the device does not pass a limit
    #[serde(default = "default_pull_limit")]
    pub default_pull_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            default_pull_limit: default_pull_limit(),
        }
    }
}

fn default_backend() -> String {
    "memory".to_string()
}

fn default_key_prefix() -> String {
    "phonectl".to_string()
}

fn default_pull_limit() -> usize {
    phonectl_api::DEFAULT_PULL_LIMIT
}

/// Load server configuration from a YAML file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ServerConfig = serde_yaml::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &ServerConfig) -> Result<(), ConfigError> {
    if config.default_pull_limit == 0 {
        return Err(ConfigError::Invalid(
            "default_pull_limit must be > 0".to_string(),
        ));
    }

    match config.store.backend.as_str() {
        "memory" => Ok(()),
        "redis" => {
            if config
                .store
                .connection_url
                .as_deref()
                .unwrap_or("")
                .trim()
                .is_empty()
            {
                return Err(ConfigError::Invalid(
                    "store.connection_url is required for the redis backend".to_string(),
                ));
            }
            if config.store.key_prefix.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "store.key_prefix must not be empty".to_string(),
                ));
            }
            Ok(())
        }
        other => Err(ConfigError::Invalid(format!(
            "store.backend '{}' not supported (expected 'memory' or 'redis')",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_when_sections_absent() {
        let file = write_config("{}\n");
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.store.backend, "memory");
        assert_eq!(config.default_pull_limit, 10);
    }

    #[test]
    fn test_redis_backend_requires_url() {
        let file = write_config("store:\n  backend: redis\n");
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::Invalid(_))
        ));

        let file = write_config(
            "store:\n  backend: redis\n  connection_url: redis://localhost:6379\n",
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.store.backend, "redis");
        assert_eq!(config.store.key_prefix, "phonectl");
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let file = write_config("store:\n  backend: mongo\n");
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_zero_pull_limit_rejected() {
        let file = write_config("default_pull_limit: 0\n");
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::Invalid(_))
        ));
    }
}
