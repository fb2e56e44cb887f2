use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum RequestGenerationError {
    #[error("could not build a valid URL from the endpoint: {0}")]
    Components(String),
}

/// Classification of a failed HTTP exchange
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("HTTP error {status_code}")]
    Http {
        status_code: u16,
        data: Option<Vec<u8>>,
    },
    #[error("not connected to the internet")]
    NotConnected,
    #[error("request was cancelled")]
    Cancelled,
    #[error("failed to generate request URL")]
    UrlGeneration(#[source] RequestGenerationError),
    #[error("request failed: {0}")]
    Request(#[source] BoxError),
}

impl NetworkError {
    pub fn has_status_code(&self, code: u16) -> bool {
        matches!(self, NetworkError::Http { status_code, .. } if *status_code == code)
    }

    pub fn is_not_found(&self) -> bool {
        self.has_status_code(404)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, NetworkError::Cancelled)
    }
}

/// Failure at the decoding layer, always traceable to a network or decode failure
#[derive(Debug, Error)]
pub enum DataTransferError {
    #[error("no response data")]
    NoResponse,
    #[error("failed to parse response: {0}")]
    Parsing(#[source] BoxError),
    #[error(transparent)]
    NetworkFailure(NetworkError),
    #[error("{0}")]
    ResolvedNetworkFailure(#[source] BoxError),
}

impl DataTransferError {
    pub fn network_error(&self) -> Option<&NetworkError> {
        match self {
            DataTransferError::NetworkFailure(error) => Some(error),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.network_error().map_or(false, NetworkError::is_cancelled)
    }
}

/// Errors that can tell "no connectivity" apart from every other failure
pub trait ConnectionError {
    fn is_internet_connection_error(&self) -> bool;
}

impl ConnectionError for NetworkError {
    fn is_internet_connection_error(&self) -> bool {
        matches!(self, NetworkError::NotConnected)
    }
}

impl ConnectionError for DataTransferError {
    fn is_internet_connection_error(&self) -> bool {
        self.network_error()
            .map_or(false, ConnectionError::is_internet_connection_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_helpers() {
        let error = NetworkError::Http { status_code: 404, data: None };
        assert!(error.is_not_found());
        assert!(error.has_status_code(404));
        assert!(!error.has_status_code(500));
        assert!(!NetworkError::NotConnected.is_not_found());
    }

    #[test]
    fn test_connection_error_only_for_not_connected() {
        assert!(DataTransferError::NetworkFailure(NetworkError::NotConnected).is_internet_connection_error());
        assert!(!DataTransferError::NetworkFailure(NetworkError::Cancelled).is_internet_connection_error());
        assert!(!DataTransferError::NoResponse.is_internet_connection_error());
        assert!(!DataTransferError::ResolvedNetworkFailure("offline".into()).is_internet_connection_error());
    }
}
