use chrono::NaiveDate;
use movie_search_models::{Movie, MovieId, MoviesPage};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoviesRequestDto {
    pub query: String,
    pub page: u32,
}

/// Body of `GET search/movie`; also the persisted cache payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoviesResponseDto {
    pub page: u32,
    pub total_pages: u32,
    #[serde(default, rename = "results")]
    pub movies: Vec<MovieDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDto {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
}

impl MovieDto {
    pub fn to_domain(&self) -> Movie {
        Movie {
            id: MovieId::from(self.id),
            title: self.title.clone().unwrap_or_default(),
            poster_path: self.poster_path.clone().filter(|p| !p.is_empty()),
            overview: self.overview.clone().unwrap_or_default(),
            release_date: self.release_date.as_deref().and_then(parse_release_date),
        }
    }
}

impl MoviesResponseDto {
    pub fn to_domain(&self) -> MoviesPage {
        MoviesPage {
            page: self.page,
            total_pages: self.total_pages,
            movies: self.movies.iter().map(MovieDto::to_domain).collect(),
        }
    }
}

/// `yyyy-MM-dd`; anything else means "no release date"
fn parse_release_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_RESPONSE: &str = r#"{
        "page": 1,
        "total_pages": 3,
        "total_results": 55,
        "results": [
            {"id": 603, "title": "The Matrix", "poster_path": "/matrix.jpg",
             "overview": "A hacker learns the truth.", "release_date": "1999-03-30",
             "vote_average": 8.2},
            {"id": 604, "title": "The Matrix Reloaded", "poster_path": null,
             "overview": "", "release_date": ""},
            {"id": 605}
        ]
    }"#;

    #[test]
    fn test_decode_search_response() {
        let dto: MoviesResponseDto = serde_json::from_str(SEARCH_RESPONSE).unwrap();
        assert_eq!(dto.page, 1);
        assert_eq!(dto.total_pages, 3);
        assert_eq!(dto.movies.len(), 3);
        assert_eq!(dto.movies[2].title, None);
    }

    #[test]
    fn test_to_domain() {
        let dto: MoviesResponseDto = serde_json::from_str(SEARCH_RESPONSE).unwrap();
        let page = dto.to_domain();

        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 3);

        let matrix = &page.movies[0];
        assert_eq!(matrix.id.as_str(), "603");
        assert_eq!(matrix.title, "The Matrix");
        assert_eq!(matrix.poster_path.as_deref(), Some("/matrix.jpg"));
        assert_eq!(matrix.release_date, NaiveDate::from_ymd_opt(1999, 3, 30));

        let reloaded = &page.movies[1];
        assert_eq!(reloaded.poster_path, None);
        assert_eq!(reloaded.release_date, None);

        let bare = &page.movies[2];
        assert_eq!(bare.title, "");
        assert_eq!(bare.overview, "");
    }

    #[test]
    fn test_malformed_dates_are_absent() {
        assert_eq!(parse_release_date("2020-13-01"), None);
        assert_eq!(parse_release_date("02/01/2020"), None);
        assert_eq!(parse_release_date("2020-01-02"), NaiveDate::from_ymd_opt(2020, 1, 2));
    }

    #[test]
    fn test_missing_results_defaults_to_empty() {
        let dto: MoviesResponseDto = serde_json::from_str(r#"{"page":2,"total_pages":2}"#).unwrap();
        assert!(dto.movies.is_empty());
    }
}
