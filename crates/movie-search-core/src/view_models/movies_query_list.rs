use crate::observable::Observable;
use crate::use_cases::FetchRecentMovieQueriesUseCase;
use movie_search_models::MovieQuery;
use std::sync::Arc;
use tracing::warn;

/// Called with the suggestion the user picked
pub type QuerySelectionHandler = Box<dyn FnMut(MovieQuery) + Send>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoviesQueryListItemViewModel {
    pub query: String,
}

/// Recent-query suggestions shown while the search field is focused
pub struct MoviesQueryListViewModel {
    number_of_queries_to_show: usize,
    fetch_recent_movie_queries_use_case: Arc<dyn FetchRecentMovieQueriesUseCase>,
    did_select: Option<QuerySelectionHandler>,

    pub items: Observable<Vec<MoviesQueryListItemViewModel>>,
}

impl MoviesQueryListViewModel {
    pub fn new(
        number_of_queries_to_show: usize,
        fetch_recent_movie_queries_use_case: Arc<dyn FetchRecentMovieQueriesUseCase>,
        did_select: Option<QuerySelectionHandler>,
    ) -> Self {
        Self {
            number_of_queries_to_show,
            fetch_recent_movie_queries_use_case,
            did_select,
            items: Observable::default(),
        }
    }

    pub async fn view_will_appear(&mut self) {
        self.update_movies_queries().await;
    }

    async fn update_movies_queries(&mut self) {
        match self
            .fetch_recent_movie_queries_use_case
            .execute(self.number_of_queries_to_show)
            .await
        {
            Ok(queries) => {
                let items = queries
                    .into_iter()
                    .map(|q| MoviesQueryListItemViewModel { query: q.query })
                    .collect();
                self.items.set(items);
            }
            Err(e) => warn!("Failed to load recent queries: {}", e),
        }
    }

    pub fn did_select(&mut self, item: &MoviesQueryListItemViewModel) {
        if let Some(handler) = self.did_select.as_mut() {
            handler(MovieQuery::new(item.query.clone()));
        }
    }
}
