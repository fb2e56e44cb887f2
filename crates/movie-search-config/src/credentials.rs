use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use toml;

/// Environment variable that takes precedence over any stored API key
pub const API_KEY_ENV_VAR: &str = "TMDB_API_KEY";

const TMDB_API_KEY: &str = "tmdb_api_key";

#[derive(Debug, Serialize, Deserialize, Default)]
struct CredentialsData {
    #[serde(flatten)]
    data: HashMap<String, String>,
}

pub struct CredentialStore {
    path: PathBuf,
    credentials: HashMap<String, String>,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            credentials: HashMap::new(),
        }
    }

    pub fn load(&mut self) -> Result<()> {
        if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)?;
            let creds_data: CredentialsData = toml::from_str(&content)?;
            self.credentials = creds_data.data;
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let creds_data = CredentialsData {
            data: self.credentials.clone(),
        };
        let content = toml::to_string_pretty(&creds_data)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.credentials.get(key)
    }

    pub fn set(&mut self, key: String, value: String) {
        self.credentials.insert(key, value);
    }

    pub fn remove(&mut self, key: &str) {
        self.credentials.remove(key);
    }

    pub fn get_api_key(&self) -> Option<&String> {
        self.get(TMDB_API_KEY)
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.set(TMDB_API_KEY.to_string(), api_key);
    }

    pub fn clear_api_key(&mut self) {
        self.remove(TMDB_API_KEY);
    }

    /// Resolve the API key: environment first, then this store, then the config file value
    pub fn resolve_api_key(&self, configured: Option<&str>) -> Option<String> {
        let from_env = std::env::var(API_KEY_ENV_VAR).ok();
        Self::first_non_empty([
            from_env.as_deref(),
            self.get_api_key().map(String::as_str),
            configured,
        ])
    }

    fn first_non_empty<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> Option<String> {
        candidates
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|key| !key.is_empty())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_api_key_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.toml");

        let mut store = CredentialStore::new(path.clone());
        store.set_api_key("abc123".to_string());
        store.save().unwrap();

        let mut reloaded = CredentialStore::new(path);
        reloaded.load().unwrap();
        assert_eq!(reloaded.get_api_key().map(String::as_str), Some("abc123"));
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let mut store = CredentialStore::new(dir.path().join("missing.toml"));
        store.load().unwrap();
        assert!(store.get_api_key().is_none());
    }

    #[test]
    fn test_first_non_empty_skips_blank_values() {
        let key = CredentialStore::first_non_empty([None, Some("  "), Some("from-config")]);
        assert_eq!(key.as_deref(), Some("from-config"));

        let key = CredentialStore::first_non_empty([Some("stored"), Some("from-config")]);
        assert_eq!(key.as_deref(), Some("stored"));

        assert!(CredentialStore::first_non_empty([None, Some("")]).is_none());
    }
}
