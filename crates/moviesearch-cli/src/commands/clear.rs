use crate::output::Output;
use color_eyre::Result;
use movie_search_config::{Config, PathManager};
use movie_search_core::{FileMoviesResponseStorage, MoviesQueriesStorage, MoviesResponseStorage};

pub async fn run_clear(all: bool, cache: bool, recent: bool, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let config = super::load_config(&path_manager)?;

    if all {
        clear_cache(&path_manager, output).await?;
        clear_recent(&path_manager, &config, output).await?;
        output.success("All cached responses and recent searches cleared");
        return Ok(());
    }

    let mut cleared_anything = false;

    if cache {
        clear_cache(&path_manager, output).await?;
        cleared_anything = true;
    }

    if recent {
        clear_recent(&path_manager, &config, output).await?;
        cleared_anything = true;
    }

    if !cleared_anything {
        output.warn("No clear option specified. Use --cache, --recent, or --all");
        output.println("\nExample: moviesearch clear --cache");
    }

    Ok(())
}

async fn clear_cache(path_manager: &PathManager, output: &Output) -> Result<()> {
    let cache_dir = path_manager.responses_cache_dir();

    if !cache_dir.exists() {
        output.info("No response cache found to clear");
        return Ok(());
    }

    FileMoviesResponseStorage::new(&cache_dir)
        .clear()
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Failed to clear response cache at {}: {}", cache_dir.display(), e))?;
    output.success(format!("Cleared response cache: {}", cache_dir.display()));
    Ok(())
}

async fn clear_recent(path_manager: &PathManager, config: &Config, output: &Output) -> Result<()> {
    let queries_file = path_manager.recent_queries_file();

    if !queries_file.exists() {
        output.info("No recent searches found to clear");
        return Ok(());
    }

    super::queries_storage(path_manager, config)
        .clear()
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Failed to clear recent searches at {}: {}", queries_file.display(), e))?;
    output.success(format!("Cleared recent searches: {}", queries_file.display()));
    Ok(())
}
