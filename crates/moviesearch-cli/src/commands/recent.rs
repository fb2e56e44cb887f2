use crate::output::{Output, OutputFormat};
use color_eyre::Result;
use movie_search_config::PathManager;
use movie_search_core::{DefaultFetchRecentMovieQueriesUseCase, FetchRecentMovieQueriesUseCase, MoviesQueriesStorage};
use owo_colors::OwoColorize;
use serde_json::json;
use std::sync::Arc;

pub async fn run_recent(limit: Option<usize>, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let config = super::load_config(&path_manager)?;

    let storage: Arc<dyn MoviesQueriesStorage> = Arc::new(super::queries_storage(&path_manager, &config));
    let use_case = DefaultFetchRecentMovieQueriesUseCase::new(storage);

    let limit = limit.unwrap_or_else(|| config.recent_queries_to_show());
    let queries = use_case
        .execute(limit)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load recent searches: {}", e))?;

    match output.format() {
        OutputFormat::Human => {
            if queries.is_empty() {
                output.info("No recent searches");
                return Ok(());
            }
            output.println(format!("{}", "Recent searches".bright_cyan().bold()));
            for (index, query) in queries.iter().enumerate() {
                output.println(format!("{:>3}. {}", index + 1, query));
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let queries: Vec<&str> = queries.iter().map(|q| q.as_str()).collect();
            output.json(&json!({
                "type": "recent_queries",
                "queries": queries,
            }));
        }
    }

    Ok(())
}
