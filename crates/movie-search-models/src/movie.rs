use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a movie as assigned by the metadata provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct MovieId(String);

impl MovieId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for MovieId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// A single search result
///
/// Identity is the `id`; two movies with the same id are the same movie
/// even when their metadata differs between pages or fetches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub poster_path: Option<String>,
    pub overview: String,
    pub release_date: Option<NaiveDate>,
}

impl Movie {
    pub fn has_poster(&self) -> bool {
        self.poster_path.as_deref().map_or(false, |p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_id_from_numeric_id() {
        let id = MovieId::from(603u64);
        assert_eq!(id.as_str(), "603");
        assert_eq!(id, MovieId::new("603"));
    }

    #[test]
    fn test_movie_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&MovieId::new("42")).unwrap();
        assert_eq!(json, "\"42\"");
    }

    #[test]
    fn test_has_poster() {
        let mut movie = Movie {
            id: MovieId::new("1"),
            title: "Heat".to_string(),
            poster_path: Some("/heat.jpg".to_string()),
            overview: String::new(),
            release_date: None,
        };
        assert!(movie.has_poster());

        movie.poster_path = Some(String::new());
        assert!(!movie.has_poster());

        movie.poster_path = None;
        assert!(!movie.has_poster());
    }
}
