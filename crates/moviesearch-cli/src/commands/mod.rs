pub mod browse;
pub mod clear;
pub mod config;
pub mod poster;
pub mod prompts;
pub mod recent;
pub mod search;
pub mod search_ui;

use color_eyre::Result;
use movie_search_config::{Config, CredentialStore, PathManager, API_KEY_ENV_VAR};
use movie_search_core::{FileMoviesQueriesStorage, MoviesSceneContainer};
use std::path::PathBuf;

/// Log file from `[logging].file`, if the config can be read at all
pub fn configured_log_file() -> Option<PathBuf> {
    let path_manager = PathManager::default();
    Config::load_or_default(&path_manager.config_file())
        .ok()
        .and_then(|config| config.logging.file)
}

pub fn load_config(path_manager: &PathManager) -> Result<Config> {
    let config_file = path_manager.config_file();
    let config = Config::load_or_default(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
    config
        .validate()
        .map_err(|e| color_eyre::eyre::eyre!("Invalid configuration in {}: {}", config_file.display(), e))?;
    Ok(config)
}

pub fn resolve_api_key(path_manager: &PathManager, config: &Config) -> Result<String> {
    let mut cred_store = CredentialStore::new(path_manager.credentials_file());
    cred_store
        .load()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load credentials: {}", e))?;

    cred_store.resolve_api_key(config.api.api_key.as_deref()).ok_or_else(|| {
        color_eyre::eyre::eyre!(
            "No TMDB API key configured. Run 'moviesearch config api-key' or set {}",
            API_KEY_ENV_VAR
        )
    })
}

/// Container for commands that talk to the API
pub fn load_scene() -> Result<MoviesSceneContainer> {
    let path_manager = PathManager::default();
    let config = load_config(&path_manager)?;
    let api_key = resolve_api_key(&path_manager, &config)?;

    path_manager
        .ensure_directories()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create data directories: {}", e))?;

    MoviesSceneContainer::new(&config, &path_manager, &api_key)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to set up movie search: {}", e))
}

/// Recent-queries store on disk; needs no API key
pub fn queries_storage(path_manager: &PathManager, config: &Config) -> FileMoviesQueriesStorage {
    FileMoviesQueriesStorage::new(path_manager.recent_queries_file(), config.storage.max_recent_queries)
}
