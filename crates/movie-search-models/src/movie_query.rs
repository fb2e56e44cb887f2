use serde::{Deserialize, Serialize};
use std::fmt;

/// A search string, used both as a search parameter and as a recent-query record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MovieQuery {
    pub query: String,
}

impl MovieQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.query
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }
}

impl fmt::Display for MovieQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.query)
    }
}

impl From<&str> for MovieQuery {
    fn from(query: &str) -> Self {
        Self::new(query)
    }
}
