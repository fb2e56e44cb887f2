use crate::error::RepositoryError;
use crate::movies_repository::{CachedPageHandler, MoviesRepository};
use crate::recent_queries::MoviesQueriesStorage;
use async_trait::async_trait;
use movie_search_models::{MovieQuery, MoviesPage};
use movie_search_network::CancellationToken;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMoviesUseCaseRequest {
    pub query: MovieQuery,
    pub page: u32,
}

#[async_trait]
pub trait SearchMoviesUseCase: Send + Sync {
    async fn execute(
        &self,
        request: SearchMoviesUseCaseRequest,
        on_cached: CachedPageHandler,
        cancel: &CancellationToken,
    ) -> Result<MoviesPage, RepositoryError>;
}

pub struct DefaultSearchMoviesUseCase {
    movies_repository: Arc<dyn MoviesRepository>,
    queries_storage: Arc<dyn MoviesQueriesStorage>,
}

impl DefaultSearchMoviesUseCase {
    pub fn new(movies_repository: Arc<dyn MoviesRepository>, queries_storage: Arc<dyn MoviesQueriesStorage>) -> Self {
        Self {
            movies_repository,
            queries_storage,
        }
    }
}

#[async_trait]
impl SearchMoviesUseCase for DefaultSearchMoviesUseCase {
    async fn execute(
        &self,
        request: SearchMoviesUseCaseRequest,
        on_cached: CachedPageHandler,
        cancel: &CancellationToken,
    ) -> Result<MoviesPage, RepositoryError> {
        let page = self
            .movies_repository
            .fetch_movies_list(&request.query, request.page, on_cached, cancel)
            .await?;

        // Saving is best effort; the search already succeeded
        if let Err(e) = self.queries_storage.save_recent_query(&request.query).await {
            warn!("Failed to save recent query '{}': {}", request.query, e);
        }

        Ok(page)
    }
}

#[async_trait]
pub trait FetchRecentMovieQueriesUseCase: Send + Sync {
    async fn execute(&self, max_count: usize) -> Result<Vec<MovieQuery>, RepositoryError>;
}

pub struct DefaultFetchRecentMovieQueriesUseCase {
    queries_storage: Arc<dyn MoviesQueriesStorage>,
}

impl DefaultFetchRecentMovieQueriesUseCase {
    pub fn new(queries_storage: Arc<dyn MoviesQueriesStorage>) -> Self {
        Self { queries_storage }
    }
}

#[async_trait]
impl FetchRecentMovieQueriesUseCase for DefaultFetchRecentMovieQueriesUseCase {
    async fn execute(&self, max_count: usize) -> Result<Vec<MovieQuery>, RepositoryError> {
        Ok(self.queries_storage.fetch_recent_queries(max_count).await?)
    }
}
