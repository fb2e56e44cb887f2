use super::prompts;
use crate::output::{Output, OutputFormat};
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Table};
use movie_search_config::{Config, CredentialStore, PathManager, API_KEY_ENV_VAR};
use owo_colors::OwoColorize;
use serde_json::json;

pub async fn run_config(cmd: crate::ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        crate::ConfigCommands::Show { full } => show_config(full, output).await,
        crate::ConfigCommands::Init { force } => init_config(force, output).await,
        crate::ConfigCommands::ApiKey { key, clear } => configure_api_key(key, clear, output).await,
    }
}

async fn show_config(full: bool, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let config_file = path_manager.config_file();

    let config = Config::load_or_default(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

    let mut cred_store = CredentialStore::new(path_manager.credentials_file());
    cred_store
        .load()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load credentials: {}", e))?;

    let source = api_key_source(&cred_store, &config);
    let api_key = cred_store.resolve_api_key(config.api.api_key.as_deref());
    let api_key_display = match &api_key {
        Some(key) if full => key.clone(),
        Some(key) => mask_string(key),
        None => "<not set>".to_string(),
    };
    let validation = config.validate().err().map(|e| e.to_string());

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }

            println!("\n{}", "Configuration".bright_cyan().bold());
            if !config_file.exists() {
                output.warn(format!(
                    "Configuration file not found at {}, showing defaults. Run 'moviesearch config init' to create it.",
                    config_file.display()
                ));
            }

            let mut table = Table::new();
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
            table.set_header(vec![
                Cell::new("Setting").add_attribute(Attribute::Bold),
                Cell::new("Value").add_attribute(Attribute::Bold),
            ]);
            table.add_row(vec![Cell::new("Config File"), Cell::new(config_file.display().to_string())]);
            table.add_row(vec![Cell::new("API Base URL"), Cell::new(&config.api.base_url)]);
            table.add_row(vec![Cell::new("Image Base URL"), Cell::new(&config.api.image_base_url)]);
            table.add_row(vec![
                Cell::new("Language"),
                Cell::new(config.api.language.as_deref().unwrap_or("<api default>")),
            ]);
            table.add_row(vec![
                Cell::new("API Key"),
                Cell::new(format!("{} ({})", api_key_display, source)),
            ]);
            table.add_row(vec![
                Cell::new("Max Recent Queries"),
                Cell::new(config.storage.max_recent_queries),
            ]);
            table.add_row(vec![
                Cell::new("Recent Queries Shown"),
                Cell::new(config.recent_queries_to_show()),
            ]);
            table.add_row(vec![
                Cell::new("Response Cache"),
                Cell::new(if config.storage.response_cache { "disk" } else { "memory" }),
            ]);
            table.add_row(vec![Cell::new("Log Requests"), Cell::new(config.network.log_requests)]);
            table.add_row(vec![
                Cell::new("Log File"),
                Cell::new(
                    config
                        .logging
                        .file
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "<stderr>".to_string()),
                ),
            ]);
            table.add_row(vec![Cell::new("Data Directory"), Cell::new(path_manager.data_dir().display().to_string())]);
            println!("{}", table);

            if let Some(problem) = validation {
                output.error(format!("Configuration is invalid: {}", problem));
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "type": "config",
                "config_file": config_file.display().to_string(),
                "exists": config_file.exists(),
                "api": {
                    "base_url": config.api.base_url,
                    "image_base_url": config.api.image_base_url,
                    "language": config.api.language,
                    "api_key": api_key.as_ref().map(|_| api_key_display.clone()),
                    "api_key_source": source,
                },
                "storage": {
                    "max_recent_queries": config.storage.max_recent_queries,
                    "recent_queries_to_show": config.recent_queries_to_show(),
                    "response_cache": config.storage.response_cache,
                },
                "network": { "log_requests": config.network.log_requests },
                "logging": { "file": config.logging.file.as_ref().map(|p| p.display().to_string()) },
                "data_dir": path_manager.data_dir().display().to_string(),
                "error": validation,
            }));
        }
    }

    Ok(())
}

async fn init_config(force: bool, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let config_file = path_manager.config_file();

    if config_file.exists() && !force {
        output.warn(format!("Configuration file already exists at {}", config_file.display()));
        output.println("\nUse --force to replace it with the default settings");
        return Ok(());
    }

    path_manager
        .ensure_directories()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create directories: {}", e))?;
    Config::default()
        .save_to_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save config to {}: {}", config_file.display(), e))?;

    output.success(format!("Configuration written to {}", config_file.display()));
    output.println("Next: moviesearch config api-key");
    Ok(())
}

async fn configure_api_key(key: Option<String>, clear: bool, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let credentials_file = path_manager.credentials_file();

    let mut cred_store = CredentialStore::new(credentials_file.clone());
    cred_store
        .load()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load credentials: {}", e))?;

    if clear {
        if cred_store.get_api_key().is_none() {
            output.info("No stored API key to clear");
            return Ok(());
        }
        cred_store.clear_api_key();
        cred_store
            .save()
            .map_err(|e| color_eyre::eyre::eyre!("Failed to save credentials: {}", e))?;
        output.success(format!("Removed API key from {}", credentials_file.display()));
        return Ok(());
    }

    let key = match key {
        Some(key) => key,
        None => prompts::prompt_password("TMDB API key")?,
    };
    let key = key.trim();
    if key.is_empty() {
        return Err(color_eyre::eyre::eyre!("API key must not be empty"));
    }

    cred_store.set_api_key(key.to_string());
    cred_store
        .save()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save credentials: {}", e))?;
    output.success(format!("Saved API key to {}", credentials_file.display()));

    if env_api_key().is_some() {
        output.warn(format!("{} is set and takes precedence over the stored key", API_KEY_ENV_VAR));
    }

    Ok(())
}

fn env_api_key() -> Option<String> {
    std::env::var(API_KEY_ENV_VAR).ok().filter(|v| !v.trim().is_empty())
}

fn api_key_source(cred_store: &CredentialStore, config: &Config) -> &'static str {
    let has = |value: Option<&str>| value.map(|v| !v.trim().is_empty()).unwrap_or(false);

    if env_api_key().is_some() {
        API_KEY_ENV_VAR
    } else if has(cred_store.get_api_key().map(String::as_str)) {
        "credentials file"
    } else if has(config.api.api_key.as_deref()) {
        "config file"
    } else {
        "not configured"
    }
}

fn mask_string(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len().max(4));
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
