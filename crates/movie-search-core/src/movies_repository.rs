use crate::error::RepositoryError;
use crate::response_cache::MoviesResponseStorage;
use async_trait::async_trait;
use movie_search_models::{MovieQuery, MoviesPage};
use movie_search_network::tmdb::{APIEndpoints, MoviesRequestDto};
use movie_search_network::{CancellationToken, DataTransferService};
use std::sync::Arc;
use tracing::{debug, warn};

/// Receives a stale page from the response cache before the live result
pub type CachedPageHandler = Box<dyn FnOnce(MoviesPage) + Send>;

#[async_trait]
pub trait MoviesRepository: Send + Sync {
    /// Always fetches live. `on_cached` fires at most once, and only while
    /// the live result is still pending and `cancel` has not fired.
    async fn fetch_movies_list(
        &self,
        query: &MovieQuery,
        page: u32,
        on_cached: CachedPageHandler,
        cancel: &CancellationToken,
    ) -> Result<MoviesPage, RepositoryError>;
}

pub struct DefaultMoviesRepository {
    data_transfer: DataTransferService,
    cache: Arc<dyn MoviesResponseStorage>,
}

impl DefaultMoviesRepository {
    pub fn new(data_transfer: DataTransferService, cache: Arc<dyn MoviesResponseStorage>) -> Self {
        Self { data_transfer, cache }
    }
}

#[async_trait]
impl MoviesRepository for DefaultMoviesRepository {
    async fn fetch_movies_list(
        &self,
        query: &MovieQuery,
        page: u32,
        on_cached: CachedPageHandler,
        cancel: &CancellationToken,
    ) -> Result<MoviesPage, RepositoryError> {
        let request = MoviesRequestDto {
            query: query.query.clone(),
            page,
        };
        let endpoint = APIEndpoints::movies(&request);

        let live = self.data_transfer.request(&endpoint, cancel);
        tokio::pin!(live);
        let mut lookup = self.cache.get_response(&request);

        let result = tokio::select! {
            biased;
            cached = &mut lookup => {
                match cached {
                    Ok(Some(response)) if !cancel.is_cancelled() => {
                        debug!("Delivering cached '{}' page {}", request.query, request.page);
                        on_cached(response.to_domain());
                    }
                    Ok(_) => {}
                    Err(e) => warn!("Failed to read cached response for '{}' page {}: {}", request.query, request.page, e),
                }
                live.await
            }
            result = &mut live => result,
        };

        let response = result?;
        if let Err(e) = self.cache.save_response(&request, &response).await {
            warn!("Failed to cache response for '{}' page {}: {}", request.query, request.page, e);
        }
        Ok(response.to_domain())
    }
}
