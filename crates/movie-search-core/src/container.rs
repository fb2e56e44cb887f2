use crate::error::StorageError;
use crate::movies_repository::{DefaultMoviesRepository, MoviesRepository};
use crate::poster_images_repository::{DefaultPosterImagesRepository, PosterImagesRepository};
use crate::recent_queries::{FileMoviesQueriesStorage, MoviesQueriesStorage};
use crate::response_cache::{FileMoviesResponseStorage, InMemoryMoviesResponseStorage, MoviesResponseStorage};
use crate::use_cases::{
    DefaultFetchRecentMovieQueriesUseCase, DefaultSearchMoviesUseCase, FetchRecentMovieQueriesUseCase,
    SearchMoviesUseCase,
};
use crate::view_models::{
    MovieDetailsViewModel, MoviesListViewModel, MoviesListViewModelActions, MoviesQueryListViewModel,
    QuerySelectionHandler,
};
use anyhow::{bail, Result};
use movie_search_config::{Config, PathManager};
use movie_search_models::Movie;
use movie_search_network::{
    ApiDataNetworkConfig, DataTransferService, DefaultNetworkService, NetworkSession, ReqwestNetworkSession,
};
use std::sync::Arc;
use tracing::info;

/// Builds the movie search scene: services, storages, repositories,
/// use cases and view-models
pub struct MoviesSceneContainer {
    api_data_transfer: DataTransferService,
    image_data_transfer: DataTransferService,
    responses_storage: Arc<dyn MoviesResponseStorage>,
    queries_storage: Arc<dyn MoviesQueriesStorage>,
    recent_queries_to_show: usize,
}

impl MoviesSceneContainer {
    pub fn new(config: &Config, paths: &PathManager, api_key: &str) -> Result<Self> {
        config.validate()?;
        if api_key.trim().is_empty() {
            bail!("TMDB API key is empty");
        }

        let session: Arc<dyn NetworkSession> = Arc::new(ReqwestNetworkSession::new()?);

        let mut api_config =
            ApiDataNetworkConfig::parse(&config.api.base_url)?.with_query_parameter("api_key", api_key.trim());
        if let Some(language) = config.api.language.as_deref().filter(|l| !l.is_empty()) {
            api_config = api_config.with_query_parameter("language", language);
        }
        let api_network = DefaultNetworkService::new(session.clone(), Arc::new(api_config))
            .with_request_logging(config.network.log_requests);

        let image_config = ApiDataNetworkConfig::parse(&config.api.image_base_url)?;
        let image_network =
            DefaultNetworkService::new(session, Arc::new(image_config)).with_request_logging(config.network.log_requests);

        let responses_storage: Arc<dyn MoviesResponseStorage> = if config.storage.response_cache {
            Arc::new(FileMoviesResponseStorage::new(paths.responses_cache_dir()))
        } else {
            info!("Response cache disabled, keeping responses in memory only");
            Arc::new(InMemoryMoviesResponseStorage::new())
        };
        let queries_storage: Arc<dyn MoviesQueriesStorage> = Arc::new(FileMoviesQueriesStorage::new(
            paths.recent_queries_file(),
            config.storage.max_recent_queries,
        ));

        Ok(Self::from_parts(
            DataTransferService::new(Arc::new(api_network)),
            DataTransferService::new(Arc::new(image_network)),
            responses_storage,
            queries_storage,
            config.recent_queries_to_show(),
        ))
    }

    pub fn from_parts(
        api_data_transfer: DataTransferService,
        image_data_transfer: DataTransferService,
        responses_storage: Arc<dyn MoviesResponseStorage>,
        queries_storage: Arc<dyn MoviesQueriesStorage>,
        recent_queries_to_show: usize,
    ) -> Self {
        Self {
            api_data_transfer,
            image_data_transfer,
            responses_storage,
            queries_storage,
            recent_queries_to_show,
        }
    }

    // Repositories

    pub fn make_movies_repository(&self) -> Arc<dyn MoviesRepository> {
        Arc::new(DefaultMoviesRepository::new(
            self.api_data_transfer.clone(),
            self.responses_storage.clone(),
        ))
    }

    pub fn make_poster_images_repository(&self) -> Arc<dyn PosterImagesRepository> {
        Arc::new(DefaultPosterImagesRepository::new(self.image_data_transfer.clone()))
    }

    // Use cases

    pub fn make_search_movies_use_case(&self) -> Arc<dyn SearchMoviesUseCase> {
        Arc::new(DefaultSearchMoviesUseCase::new(
            self.make_movies_repository(),
            self.queries_storage.clone(),
        ))
    }

    pub fn make_fetch_recent_movie_queries_use_case(&self) -> Arc<dyn FetchRecentMovieQueriesUseCase> {
        Arc::new(DefaultFetchRecentMovieQueriesUseCase::new(self.queries_storage.clone()))
    }

    // View-models

    pub fn make_movies_list_view_model(&self, actions: MoviesListViewModelActions) -> MoviesListViewModel {
        MoviesListViewModel::new(self.make_search_movies_use_case(), actions)
    }

    pub fn make_movie_details_view_model(&self, movie: &Movie) -> MovieDetailsViewModel {
        MovieDetailsViewModel::new(movie, self.make_poster_images_repository())
    }

    pub fn make_movies_query_list_view_model(&self, did_select: Option<QuerySelectionHandler>) -> MoviesQueryListViewModel {
        MoviesQueryListViewModel::new(
            self.recent_queries_to_show,
            self.make_fetch_recent_movie_queries_use_case(),
            did_select,
        )
    }

    // Maintenance

    pub async fn clear_response_cache(&self) -> Result<(), StorageError> {
        self.responses_storage.clear().await
    }

    pub async fn clear_recent_queries(&self) -> Result<(), StorageError> {
        self.queries_storage.clear().await
    }

    pub async fn clear_all(&self) -> Result<(), StorageError> {
        futures::try_join!(self.responses_storage.clear(), self.queries_storage.clear())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recent_queries::InMemoryMoviesQueriesStorage;
    use crate::test_support::{ok, page_json, requested_page, transfer, StubNetwork};
    use movie_search_models::MovieQuery;
    use tempfile::TempDir;

    fn container(network: &Arc<StubNetwork>, queries: Arc<InMemoryMoviesQueriesStorage>) -> MoviesSceneContainer {
        MoviesSceneContainer::from_parts(
            transfer(network),
            transfer(network),
            Arc::new(InMemoryMoviesResponseStorage::new()),
            queries,
            2,
        )
    }

    #[tokio::test]
    async fn test_search_flow_end_to_end() {
        let network = StubNetwork::new(|endpoint| ok(page_json(requested_page(endpoint), 2, &[1, 2])));
        let queries = Arc::new(InMemoryMoviesQueriesStorage::new(10));
        let container = container(&network, queries.clone());

        let mut list = container.make_movies_list_view_model(MoviesListViewModelActions::default());
        list.did_search("batman");
        list.wait_for_load().await;

        assert_eq!(list.items.get().len(), 2);
        assert_eq!(list.current_page(), 1);
        assert_eq!(queries.fetch_recent_queries(5).await.unwrap(), vec![MovieQuery::new("batman")]);

        // second fetch of the same page comes through the cache first
        list.did_search("batman");
        list.wait_for_load().await;
        assert_eq!(network.calls(), 2);
        assert_eq!(list.items.get().len(), 2);
    }

    #[tokio::test]
    async fn test_query_list_uses_configured_count() {
        let network = StubNetwork::new(|_| ok(Vec::new()));
        let queries = Arc::new(InMemoryMoviesQueriesStorage::new(10));
        for q in ["a", "b", "c"] {
            queries.save_recent_query(&MovieQuery::new(q)).await.unwrap();
        }
        let container = container(&network, queries.clone());

        let mut suggestions = container.make_movies_query_list_view_model(None);
        suggestions.view_will_appear().await;
        assert_eq!(suggestions.items.get().len(), 2);

        container.clear_all().await.unwrap();
        assert!(queries.fetch_recent_queries(5).await.unwrap().is_empty());
    }

    #[test]
    fn test_new_requires_api_key() {
        let dir = TempDir::new().unwrap();
        let paths = PathManager::with_base_dir(dir.path().to_path_buf());
        let config = Config::default();

        assert!(MoviesSceneContainer::new(&config, &paths, "  ").is_err());
        assert!(MoviesSceneContainer::new(&config, &paths, "key").is_ok());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let dir = TempDir::new().unwrap();
        let paths = PathManager::with_base_dir(dir.path().to_path_buf());
        let mut config = Config::default();
        config.api.base_url = "not a url".to_string();

        assert!(MoviesSceneContainer::new(&config, &paths, "key").is_err());
    }
}
