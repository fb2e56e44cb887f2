use movie_search_network::{ConnectionError, DataTransferError};
use thiserror::Error;

/// Failure of a local persistence backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to (de)serialize stored data: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    DataTransfer(#[from] DataTransferError),
    #[error("persistent storage error: {0}")]
    PersistentStorage(#[from] StorageError),
}

impl RepositoryError {
    pub fn is_cancelled(&self) -> bool {
        match self {
            RepositoryError::DataTransfer(e) => e.is_cancelled(),
            RepositoryError::PersistentStorage(_) => false,
        }
    }
}

impl ConnectionError for RepositoryError {
    fn is_internet_connection_error(&self) -> bool {
        match self {
            RepositoryError::DataTransfer(e) => e.is_internet_connection_error(),
            RepositoryError::PersistentStorage(_) => false,
        }
    }
}
