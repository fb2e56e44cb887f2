use crate::error::StorageError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use movie_search_network::tmdb::{MoviesRequestDto, MoviesResponseDto};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Advisory store of the last response fetched for each `(query, page)`
#[async_trait]
pub trait MoviesResponseStorage: Send + Sync {
    /// A miss is `Ok(None)`, never an error
    async fn get_response(&self, request: &MoviesRequestDto) -> Result<Option<MoviesResponseDto>, StorageError>;

    /// Insert or replace the entry for `request`
    async fn save_response(&self, request: &MoviesRequestDto, response: &MoviesResponseDto) -> Result<(), StorageError>;

    async fn clear(&self) -> Result<(), StorageError>;
}

/// On-disk layout of one cached response
#[derive(Debug, Serialize, Deserialize)]
struct CachedMoviesResponse {
    query: String,
    page: u32,
    saved_at: DateTime<Utc>,
    response: MoviesResponseDto,
}

const MAX_ENCODED_QUERY_LEN: usize = 180;

/// One JSON file per `(query, page)` under a cache directory
pub struct FileMoviesResponseStorage {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl FileMoviesResponseStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, request: &MoviesRequestDto) -> PathBuf {
        let encoded = urlencoding::encode(&request.query);
        let name = if encoded.len() <= MAX_ENCODED_QUERY_LEN {
            format!("{}-{}.json", request.page, encoded)
        } else {
            let digest = Sha256::digest(request.query.as_bytes());
            let hex: String = digest[..8].iter().map(|byte| format!("{:02x}", byte)).collect();
            format!("{}-{}.json", request.page, hex)
        };
        self.dir.join(name)
    }
}

#[async_trait]
impl MoviesResponseStorage for FileMoviesResponseStorage {
    async fn get_response(&self, request: &MoviesRequestDto) -> Result<Option<MoviesResponseDto>, StorageError> {
        let _guard = self.lock.lock().await;
        let path = self.entry_path(request);

        let content = match tokio::fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Cache miss: '{}' page {}", request.query, request.page);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice::<CachedMoviesResponse>(&content) {
            Ok(entry) if entry.query == request.query && entry.page == request.page => {
                info!(
                    "Cache hit: '{}' page {} ({} movies, saved {})",
                    request.query,
                    request.page,
                    entry.response.movies.len(),
                    entry.saved_at
                );
                Ok(Some(entry.response))
            }
            Ok(_) => {
                debug!("Cache miss: '{}' page {} (key collision)", request.query, request.page);
                Ok(None)
            }
            Err(e) => {
                warn!(
                    "Cache corruption detected for '{}' page {}: {}. Deleting corrupted file.",
                    request.query, request.page, e
                );
                if let Err(rm_err) = tokio::fs::remove_file(&path).await {
                    warn!("Failed to delete corrupted cache file: {}", rm_err);
                }
                Ok(None)
            }
        }
    }

    async fn save_response(&self, request: &MoviesRequestDto, response: &MoviesResponseDto) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let path = self.entry_path(request);

        let entry = CachedMoviesResponse {
            query: request.query.clone(),
            page: request.page,
            saved_at: Utc::now(),
            response: response.clone(),
        };
        let json = serde_json::to_vec_pretty(&entry)?;

        tokio::fs::create_dir_all(&self.dir).await?;
        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, json).await?;
        tokio::fs::rename(&temp_path, &path).await?;

        debug!("Cache saved: '{}' page {} ({} movies)", request.query, request.page, response.movies.len());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        match tokio::fs::remove_dir_all(&self.dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        tokio::fs::create_dir_all(&self.dir).await?;
        info!("Cleared response cache directory: {:?}", self.dir);
        Ok(())
    }
}

/// Process-lifetime cache, used when disk caching is disabled
#[derive(Default)]
pub struct InMemoryMoviesResponseStorage {
    entries: Mutex<HashMap<MoviesRequestDto, MoviesResponseDto>>,
}

impl InMemoryMoviesResponseStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MoviesResponseStorage for InMemoryMoviesResponseStorage {
    async fn get_response(&self, request: &MoviesRequestDto) -> Result<Option<MoviesResponseDto>, StorageError> {
        Ok(self.entries.lock().await.get(request).cloned())
    }

    async fn save_response(&self, request: &MoviesRequestDto, response: &MoviesResponseDto) -> Result<(), StorageError> {
        self.entries.lock().await.insert(request.clone(), response.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.entries.lock().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use movie_search_network::tmdb::MovieDto;
    use tempfile::TempDir;

    fn request(query: &str, page: u32) -> MoviesRequestDto {
        MoviesRequestDto {
            query: query.to_string(),
            page,
        }
    }

    fn response(page: u32, titles: &[&str]) -> MoviesResponseDto {
        MoviesResponseDto {
            page,
            total_pages: 5,
            movies: titles
                .iter()
                .enumerate()
                .map(|(i, title)| MovieDto {
                    id: i as u64 + 1,
                    title: Some(title.to_string()),
                    poster_path: None,
                    overview: None,
                    release_date: Some("2001-09-11".to_string()),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_file_storage_miss_then_hit() {
        let dir = TempDir::new().unwrap();
        let storage = FileMoviesResponseStorage::new(dir.path().join("responses"));

        assert!(storage.get_response(&request("alien", 1)).await.unwrap().is_none());

        storage.save_response(&request("alien", 1), &response(1, &["Alien"])).await.unwrap();
        let cached = storage.get_response(&request("alien", 1)).await.unwrap().unwrap();
        assert_eq!(cached, response(1, &["Alien"]));

        assert!(storage.get_response(&request("alien", 2)).await.unwrap().is_none());
        assert!(storage.get_response(&request("Alien", 1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_storage_replaces_existing_entry() {
        let dir = TempDir::new().unwrap();
        let storage = FileMoviesResponseStorage::new(dir.path());

        storage.save_response(&request("heat", 1), &response(1, &["Heat"])).await.unwrap();
        storage.save_response(&request("heat", 1), &response(1, &["Heat", "Heat 2"])).await.unwrap();

        let cached = storage.get_response(&request("heat", 1)).await.unwrap().unwrap();
        assert_eq!(cached.movies.len(), 2);

        let files = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(files, 1);
    }

    #[tokio::test]
    async fn test_file_storage_handles_unsafe_and_long_queries() {
        let dir = TempDir::new().unwrap();
        let storage = FileMoviesResponseStorage::new(dir.path());

        let slashes = request("../../etc/passwd", 1);
        storage.save_response(&slashes, &response(1, &["Nope"])).await.unwrap();
        assert!(storage.get_response(&slashes).await.unwrap().is_some());

        let long = request(&"x".repeat(400), 1);
        storage.save_response(&long, &response(1, &["Long"])).await.unwrap();
        assert!(storage.get_response(&long).await.unwrap().is_some());

        for entry in std::fs::read_dir(dir.path()).unwrap() {
            assert_eq!(entry.unwrap().path().parent(), Some(dir.path()));
        }
    }

    #[test]
    fn test_long_query_file_name_is_stable() {
        let storage = FileMoviesResponseStorage::new("/cache");

        let path = storage.entry_path(&request(&"x".repeat(400), 3));
        assert_eq!(path, Path::new("/cache").join("3-7b0bd700ce066ef3.json"));

        let path = storage.entry_path(&request("star wars", 1));
        assert_eq!(path, Path::new("/cache").join("1-star%20wars.json"));
    }

    #[tokio::test]
    async fn test_corrupted_entry_is_deleted_and_missed() {
        let dir = TempDir::new().unwrap();
        let storage = FileMoviesResponseStorage::new(dir.path());
        let key = request("brazil", 1);

        storage.save_response(&key, &response(1, &["Brazil"])).await.unwrap();
        let path = storage.entry_path(&key);
        std::fs::write(&path, b"{ truncated").unwrap();

        assert!(storage.get_response(&key).await.unwrap().is_none());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_file_storage_clear() {
        let dir = TempDir::new().unwrap();
        let storage = FileMoviesResponseStorage::new(dir.path().join("responses"));

        storage.save_response(&request("up", 1), &response(1, &["Up"])).await.unwrap();
        storage.clear().await.unwrap();

        assert!(storage.get_response(&request("up", 1)).await.unwrap().is_none());
        assert!(storage.dir().exists());
    }

    #[tokio::test]
    async fn test_in_memory_storage() {
        let storage = InMemoryMoviesResponseStorage::new();
        assert!(storage.get_response(&request("jaws", 1)).await.unwrap().is_none());

        storage.save_response(&request("jaws", 1), &response(1, &["Jaws"])).await.unwrap();
        storage.save_response(&request("jaws", 1), &response(1, &["Jaws 2"])).await.unwrap();
        let cached = storage.get_response(&request("jaws", 1)).await.unwrap().unwrap();
        assert_eq!(cached.movies[0].title.as_deref(), Some("Jaws 2"));

        storage.clear().await.unwrap();
        assert!(storage.get_response(&request("jaws", 1)).await.unwrap().is_none());
    }
}
