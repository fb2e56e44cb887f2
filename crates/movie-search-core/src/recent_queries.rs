use crate::error::StorageError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use movie_search_models::MovieQuery;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Bounded most-recent-first list of successful search strings
#[async_trait]
pub trait MoviesQueriesStorage: Send + Sync {
    /// Up to `min(max_count, limit)` entries, newest first
    async fn fetch_recent_queries(&self, max_count: usize) -> Result<Vec<MovieQuery>, StorageError>;

    async fn save_recent_query(&self, query: &MovieQuery) -> Result<MovieQuery, StorageError>;

    async fn clear(&self) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentQueryRecord {
    pub query: String,
    pub created_at: DateTime<Utc>,
}

impl RecentQueryRecord {
    fn new(query: &MovieQuery) -> Self {
        Self {
            query: query.query.clone(),
            created_at: Utc::now(),
        }
    }
}

/// Remove equal entries, push to the front, drop the oldest beyond `limit`
fn insert_recent_query(records: &mut Vec<RecentQueryRecord>, record: RecentQueryRecord, limit: usize) {
    records.retain(|existing| existing.query != record.query);
    records.insert(0, record);
    records.truncate(limit);
}

fn most_recent(records: &[RecentQueryRecord], max_count: usize, limit: usize) -> Vec<MovieQuery> {
    let mut sorted: Vec<&RecentQueryRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted
        .into_iter()
        .take(max_count.min(limit))
        .map(|record| MovieQuery::new(record.query.clone()))
        .collect()
}

/// JSON array of `{query, created_at}` records in one file
pub struct FileMoviesQueriesStorage {
    path: PathBuf,
    max_storage_limit: usize,
    lock: Mutex<()>,
}

impl FileMoviesQueriesStorage {
    pub fn new(path: impl Into<PathBuf>, max_storage_limit: usize) -> Self {
        Self {
            path: path.into(),
            max_storage_limit,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<RecentQueryRecord>, StorageError> {
        let content = match tokio::fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice(&content) {
            Ok(records) => Ok(records),
            Err(e) => {
                warn!("Recent queries file {:?} is corrupted ({}), starting empty", self.path, e);
                Ok(Vec::new())
            }
        }
    }

    async fn store(&self, records: &[RecentQueryRecord]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(records)?;
        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, json).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl MoviesQueriesStorage for FileMoviesQueriesStorage {
    async fn fetch_recent_queries(&self, max_count: usize) -> Result<Vec<MovieQuery>, StorageError> {
        let _guard = self.lock.lock().await;
        let records = self.load().await?;
        Ok(most_recent(&records, max_count, self.max_storage_limit))
    }

    async fn save_recent_query(&self, query: &MovieQuery) -> Result<MovieQuery, StorageError> {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;
        insert_recent_query(&mut records, RecentQueryRecord::new(query), self.max_storage_limit);
        self.store(&records).await?;
        debug!("Saved recent query '{}' ({} stored)", query, records.len());
        Ok(query.clone())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

pub struct InMemoryMoviesQueriesStorage {
    records: Mutex<Vec<RecentQueryRecord>>,
    max_storage_limit: usize,
}

impl InMemoryMoviesQueriesStorage {
    pub fn new(max_storage_limit: usize) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            max_storage_limit,
        }
    }
}

#[async_trait]
impl MoviesQueriesStorage for InMemoryMoviesQueriesStorage {
    async fn fetch_recent_queries(&self, max_count: usize) -> Result<Vec<MovieQuery>, StorageError> {
        let records = self.records.lock().await;
        Ok(most_recent(&records, max_count, self.max_storage_limit))
    }

    async fn save_recent_query(&self, query: &MovieQuery) -> Result<MovieQuery, StorageError> {
        let mut records = self.records.lock().await;
        insert_recent_query(&mut records, RecentQueryRecord::new(query), self.max_storage_limit);
        Ok(query.clone())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.records.lock().await.clear();
        Ok(())
    }
}
