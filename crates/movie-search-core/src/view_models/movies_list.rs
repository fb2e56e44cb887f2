use super::movies_list_item::MoviesListItemViewModel;
use crate::error::RepositoryError;
use crate::movies_repository::CachedPageHandler;
use crate::observable::Observable;
use crate::use_cases::{SearchMoviesUseCase, SearchMoviesUseCaseRequest};
use movie_search_models::{Movie, MovieId, MovieQuery, MoviesPage};
use movie_search_network::{CancellationToken, ConnectionError};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub const SCREEN_TITLE: &str = "Movies";
pub const EMPTY_DATA_TITLE: &str = "Search results";
pub const ERROR_TITLE: &str = "Error";
pub const SEARCH_BAR_PLACEHOLDER: &str = "Search Movies";
pub const NO_INTERNET_CONNECTION: &str = "No internet connection";
pub const FAILED_LOADING_MOVIES: &str = "Failed loading movies";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoviesListViewModelLoading {
    FullScreen,
    NextPage,
}

/// Navigation requests emitted to whoever owns the view-model
#[derive(Default)]
pub struct MoviesListViewModelActions {
    pub show_movie_details: Option<Box<dyn FnMut(&Movie) + Send>>,
}

enum LoadEvent {
    Cached(MoviesPage),
    Finished(Result<MoviesPage, RepositoryError>),
}

struct InFlightLoad {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
    events: mpsc::UnboundedReceiver<LoadEvent>,
}

impl InFlightLoad {
    fn cancel(self) {
        self.cancel.cancel();
        self.handle.abort();
    }
}

/// Paginated search results.
///
/// Loads run on spawned tasks and report back through a channel; their
/// results are only applied from [`wait_for_load`](Self::wait_for_load) or
/// [`poll_load`](Self::poll_load), so all state changes happen on the
/// caller's context. A superseded or cancelled load never applies anything.
pub struct MoviesListViewModel {
    search_movies_use_case: Arc<dyn SearchMoviesUseCase>,
    actions: MoviesListViewModelActions,
    current_page: u32,
    total_pages: u32,
    pages: BTreeMap<u32, Vec<Movie>>,
    in_flight: Option<InFlightLoad>,

    pub items: Observable<Vec<MoviesListItemViewModel>>,
    pub loading: Observable<Option<MoviesListViewModelLoading>>,
    pub query: Observable<String>,
    pub error: Observable<String>,
}

impl MoviesListViewModel {
    pub fn new(search_movies_use_case: Arc<dyn SearchMoviesUseCase>, actions: MoviesListViewModelActions) -> Self {
        Self {
            search_movies_use_case,
            actions,
            current_page: 0,
            total_pages: 1,
            pages: BTreeMap::new(),
            in_flight: None,
            items: Observable::default(),
            loading: Observable::new(None),
            query: Observable::default(),
            error: Observable::default(),
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn has_more_pages(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn next_page(&self) -> u32 {
        if self.has_more_pages() {
            self.current_page + 1
        } else {
            self.current_page
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.get().is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    // Inputs

    pub fn did_search(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }
        self.cancel_in_flight();
        self.reset_pages();
        self.load(MovieQuery::new(query), MoviesListViewModelLoading::FullScreen);
    }

    pub fn did_select_query(&mut self, query: &MovieQuery) {
        self.did_search(query.as_str());
    }

    pub fn did_load_next_page(&mut self) {
        if !self.has_more_pages() || self.loading.get().is_some() || self.query.get().is_empty() {
            return;
        }
        let query = MovieQuery::new(self.query.get().clone());
        self.load(query, MoviesListViewModelLoading::NextPage);
    }

    pub fn did_cancel_search(&mut self) {
        if self.cancel_in_flight() {
            info!("Search for '{}' cancelled", self.query.get());
        }
        self.loading.set(None);
    }

    /// Movie at `index` in the displayed list, forwarded to `show_movie_details`
    pub fn did_select_item(&mut self, index: usize) -> Option<Movie> {
        let movie = self.movies().get(index).map(|(_, movie)| (*movie).clone())?;
        if let Some(show) = self.actions.show_movie_details.as_mut() {
            show(&movie);
        }
        Some(movie)
    }

    /// Apply everything the in-flight load reports until it completes
    pub async fn wait_for_load(&mut self) {
        while let Some(load) = self.in_flight.as_mut() {
            let event = load.events.recv().await;
            match event {
                Some(event) => self.apply(event),
                None => self.finish_load(),
            }
        }
    }

    /// Apply whatever has already arrived; true while a load is still running
    pub fn poll_load(&mut self) -> bool {
        while let Some(load) = self.in_flight.as_mut() {
            let event = load.events.try_recv();
            match event {
                Ok(event) => self.apply(event),
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Disconnected) => self.finish_load(),
            }
        }
        false
    }

    fn load(&mut self, query: MovieQuery, loading: MoviesListViewModelLoading) {
        self.loading.set(Some(loading));
        self.query.set(query.query.clone());

        let request = SearchMoviesUseCaseRequest {
            query,
            page: self.next_page(),
        };
        debug!("Loading '{}' page {}", request.query, request.page);

        let cancel = CancellationToken::new();
        let (events_tx, events) = mpsc::unbounded_channel();
        let use_case = Arc::clone(&self.search_movies_use_case);
        let task_cancel = cancel.clone();

        let handle = tokio::spawn(async move {
            let cached_tx = events_tx.clone();
            let on_cached: CachedPageHandler = Box::new(move |page| {
                let _ = cached_tx.send(LoadEvent::Cached(page));
            });
            let result = use_case.execute(request, on_cached, &task_cancel).await;
            let _ = events_tx.send(LoadEvent::Finished(result));
        });

        self.in_flight = Some(InFlightLoad { cancel, handle, events });
    }

    fn apply(&mut self, event: LoadEvent) {
        match event {
            LoadEvent::Cached(page) => {
                debug!("Showing cached page {} while loading", page.page);
                self.pages.insert(page.page, page.movies);
                self.refresh_items();
            }
            LoadEvent::Finished(result) => {
                self.finish_load();
                match result {
                    Ok(page) => self.append_page(page),
                    Err(e) => self.handle_error(e),
                }
            }
        }
    }

    fn append_page(&mut self, page: MoviesPage) {
        self.current_page = page.page;
        self.total_pages = page.total_pages;
        self.pages.insert(page.page, page.movies);
        self.refresh_items();
    }

    fn handle_error(&mut self, error: RepositoryError) {
        if error.is_cancelled() {
            debug!("Load cancelled");
            return;
        }
        warn!("Failed to load movies for '{}': {}", self.query.get(), error);
        let message = if error.is_internet_connection_error() {
            NO_INTERNET_CONNECTION
        } else {
            FAILED_LOADING_MOVIES
        };
        self.error.set(message.to_string());
    }

    fn finish_load(&mut self) {
        self.in_flight = None;
        self.loading.set(None);
    }

    fn cancel_in_flight(&mut self) -> bool {
        match self.in_flight.take() {
            Some(load) => {
                load.cancel();
                true
            }
            None => false,
        }
    }

    fn reset_pages(&mut self) {
        self.current_page = 0;
        self.total_pages = 1;
        self.pages.clear();
        self.items.set(Vec::new());
    }

    /// Movies of all loaded pages in page order, first occurrence of an id wins
    fn movies(&self) -> Vec<(u32, &Movie)> {
        let mut seen: HashSet<&MovieId> = HashSet::new();
        self.pages
            .iter()
            .flat_map(|(page, movies)| movies.iter().map(move |movie| (*page, movie)))
            .filter(|(_, movie)| seen.insert(&movie.id))
            .collect()
    }

    fn refresh_items(&mut self) {
        let items: Vec<MoviesListItemViewModel> = self
            .movies()
            .into_iter()
            .map(|(page, movie)| MoviesListItemViewModel::new(movie, page))
            .collect();
        self.items.set(items);
    }
}

impl Drop for MoviesListViewModel {
    fn drop(&mut self) {
        self.cancel_in_flight();
    }
}
