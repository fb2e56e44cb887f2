pub mod container;
pub mod error;
pub mod movies_repository;
pub mod observable;
pub mod poster_images_repository;
pub mod recent_queries;
pub mod response_cache;
pub mod use_cases;
pub mod view_models;

#[cfg(test)]
mod test_support;

pub use container::MoviesSceneContainer;
pub use error::{RepositoryError, StorageError};
pub use movies_repository::{CachedPageHandler, DefaultMoviesRepository, MoviesRepository};
pub use observable::{Observable, ObserverId};
pub use poster_images_repository::{DefaultPosterImagesRepository, PosterImagesRepository};
pub use recent_queries::{FileMoviesQueriesStorage, InMemoryMoviesQueriesStorage, MoviesQueriesStorage};
pub use response_cache::{FileMoviesResponseStorage, InMemoryMoviesResponseStorage, MoviesResponseStorage};
pub use use_cases::{
    DefaultFetchRecentMovieQueriesUseCase, DefaultSearchMoviesUseCase, FetchRecentMovieQueriesUseCase,
    SearchMoviesUseCase, SearchMoviesUseCaseRequest,
};
