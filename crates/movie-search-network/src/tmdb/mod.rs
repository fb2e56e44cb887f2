//! The Movie Database (TMDB) v3 endpoints and wire types

pub mod dto;
pub mod endpoints;

pub use dto::{MovieDto, MoviesRequestDto, MoviesResponseDto};
pub use endpoints::{closest_poster_width, APIEndpoints, POSTER_WIDTHS};
