use chrono::NaiveDate;
use movie_search_models::{Movie, MovieId};
use serde::Serialize;

pub const RELEASE_DATE_UNKNOWN: &str = "To be announced";

/// Display-ready row of the search results list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoviesListItemViewModel {
    pub id: MovieId,
    pub title: String,
    pub overview: String,
    pub release_date: String,
    pub poster_image_path: Option<String>,
    /// Results page the movie was delivered on
    pub page: u32,
}

impl MoviesListItemViewModel {
    pub fn new(movie: &Movie, page: u32) -> Self {
        Self {
            id: movie.id.clone(),
            title: movie.title.clone(),
            overview: movie.overview.clone(),
            release_date: format_release_date(movie.release_date),
            poster_image_path: movie.poster_path.clone(),
            page,
        }
    }
}

fn format_release_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => format!("Release Date: {}", date.format("%b %-d, %Y")),
        None => RELEASE_DATE_UNKNOWN.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(release_date: Option<NaiveDate>) -> Movie {
        Movie {
            id: MovieId::new("27205"),
            title: "Inception".to_string(),
            poster_path: Some("/inception.jpg".to_string()),
            overview: "Dreams within dreams.".to_string(),
            release_date,
        }
    }

    #[test]
    fn test_release_date_formatting() {
        let item = MoviesListItemViewModel::new(&movie(NaiveDate::from_ymd_opt(2020, 1, 2)), 1);
        assert_eq!(item.release_date, "Release Date: Jan 2, 2020");

        let item = MoviesListItemViewModel::new(&movie(NaiveDate::from_ymd_opt(2010, 7, 16)), 1);
        assert_eq!(item.release_date, "Release Date: Jul 16, 2010");
    }

    #[test]
    fn test_missing_release_date() {
        let item = MoviesListItemViewModel::new(&movie(None), 3);
        assert_eq!(item.release_date, RELEASE_DATE_UNKNOWN);
        assert_eq!(item.page, 3);
        assert_eq!(item.poster_image_path.as_deref(), Some("/inception.jpg"));
    }
}
