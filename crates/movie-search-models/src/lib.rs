pub mod movie;
pub mod movie_query;
pub mod movies_page;

pub use movie::{Movie, MovieId};
pub use movie_query::MovieQuery;
pub use movies_page::MoviesPage;
