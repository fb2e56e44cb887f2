pub mod movie_details;
pub mod movies_list;
pub mod movies_list_item;
pub mod movies_query_list;

pub use movie_details::{MovieDetailsViewModel, PosterLoadCancellation};
pub use movies_list::{MoviesListViewModel, MoviesListViewModelActions, MoviesListViewModelLoading};
pub use movies_list_item::MoviesListItemViewModel;
pub use movies_query_list::{MoviesQueryListItemViewModel, MoviesQueryListViewModel, QuerySelectionHandler};
