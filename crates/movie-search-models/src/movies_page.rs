use crate::movie::Movie;
use serde::{Deserialize, Serialize};

/// One page of search results. `page` is 1-based.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoviesPage {
    pub page: u32,
    pub total_pages: u32,
    pub movies: Vec<Movie>,
}

impl MoviesPage {
    pub fn is_last(&self) -> bool {
        self.page >= self.total_pages
    }
}
