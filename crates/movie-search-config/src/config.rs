use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_API_BASE_URL: &str = "https://api.themoviedb.org/3/";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    /// Prefer credentials.toml or TMDB_API_KEY; this is the last fallback
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Upper bound on stored recent queries
    #[serde(default = "default_max_recent_queries")]
    pub max_recent_queries: usize,
    /// How many suggestions the query list shows
    #[serde(default = "default_recent_queries_to_show")]
    pub recent_queries_to_show: usize,
    /// Persist search responses on disk; in-memory only when false
    #[serde(default = "default_true")]
    pub response_cache: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetworkConfig {
    /// Trace request/response details at debug level
    #[serde(default)]
    pub log_requests: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_image_base_url() -> String {
    DEFAULT_IMAGE_BASE_URL.to_string()
}

fn default_max_recent_queries() -> usize {
    10
}

fn default_recent_queries_to_show() -> usize {
    10
}

fn default_true() -> bool {
    true
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            image_base_url: default_image_base_url(),
            api_key: None,
            language: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            max_recent_queries: default_max_recent_queries(),
            recent_queries_to_show: default_recent_queries_to_show(),
            response_cache: default_true(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        validate_base_url("api.base_url", &self.api.base_url)?;
        validate_base_url("api.image_base_url", &self.api.image_base_url)?;

        if self.storage.max_recent_queries == 0 {
            return Err(anyhow::anyhow!("storage.max_recent_queries must be at least 1"));
        }

        Ok(())
    }

    /// Number of suggestions to request, never more than what is stored
    pub fn recent_queries_to_show(&self) -> usize {
        self.storage
            .recent_queries_to_show
            .min(self.storage.max_recent_queries)
    }
}

fn validate_base_url(name: &str, value: &str) -> anyhow::Result<()> {
    let value = value.trim();
    if value.is_empty() {
        return Err(anyhow::anyhow!("{} must not be empty", name));
    }
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        return Err(anyhow::anyhow!("{} must be an http(s) URL, got '{}'", name, value));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let config = Config {
            api: ApiConfig {
                api_key: Some("test_key".to_string()),
                language: Some("de-DE".to_string()),
                ..ApiConfig::default()
            },
            storage: StorageConfig {
                max_recent_queries: 5,
                ..StorageConfig::default()
            },
            network: NetworkConfig { log_requests: true },
            logging: LoggingConfig::default(),
        };

        let path = file.path().to_path_buf();
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.api.api_key.as_deref(), Some("test_key"));
        assert_eq!(loaded.api.language.as_deref(), Some("de-DE"));
        assert_eq!(loaded.api.base_url, DEFAULT_API_BASE_URL);
        assert_eq!(loaded.storage.max_recent_queries, 5);
        assert_eq!(loaded.network.log_requests, true);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[storage]\nmax_recent_queries = 3\n").unwrap();
        assert_eq!(config.storage.max_recent_queries, 3);
        assert_eq!(config.storage.recent_queries_to_show, 10);
        assert_eq!(config.recent_queries_to_show(), 3);
        assert!(config.storage.response_cache);
        assert_eq!(config.api.image_base_url, DEFAULT_IMAGE_BASE_URL);
        assert!(!config.network.log_requests);
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config::load_or_default(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.api.base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.storage.max_recent_queries = 0;
        assert!(config.validate().is_err());

        config.storage.max_recent_queries = 10;
        config.api.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = DEFAULT_API_BASE_URL.to_string();
        config.api.image_base_url = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
