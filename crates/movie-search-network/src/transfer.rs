use crate::endpoint::Endpoint;
use crate::error::{DataTransferError, NetworkError};
use crate::network::NetworkService;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Hook that may translate a network failure into a domain-specific error
pub trait DataTransferErrorResolver: Send + Sync {
    /// `None` leaves the error as a plain network failure
    fn resolve(&self, error: &NetworkError) -> Option<BoxError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDataTransferErrorResolver;

impl DataTransferErrorResolver for DefaultDataTransferErrorResolver {
    fn resolve(&self, _error: &NetworkError) -> Option<BoxError> {
        None
    }
}

/// Decoding layer on top of a `NetworkService`
#[derive(Clone)]
pub struct DataTransferService {
    network: Arc<dyn NetworkService>,
    error_resolver: Arc<dyn DataTransferErrorResolver>,
}

impl DataTransferService {
    pub fn new(network: Arc<dyn NetworkService>) -> Self {
        Self::with_error_resolver(network, Arc::new(DefaultDataTransferErrorResolver))
    }

    pub fn with_error_resolver(
        network: Arc<dyn NetworkService>,
        error_resolver: Arc<dyn DataTransferErrorResolver>,
    ) -> Self {
        Self {
            network,
            error_resolver,
        }
    }

    pub async fn request<T>(
        &self,
        endpoint: &Endpoint<T>,
        cancel: &CancellationToken,
    ) -> Result<T, DataTransferError> {
        let result = match self.network.request(endpoint, cancel).await {
            Ok(response) => match response.data {
                Some(data) => endpoint
                    .response_decoder()
                    .decode(&data)
                    .map_err(DataTransferError::Parsing),
                None => Err(DataTransferError::NoResponse),
            },
            Err(error) => Err(self.resolve(error)),
        };

        if let Err(e) = &result {
            if !e.is_cancelled() {
                warn!(error = %e, "Data transfer failed");
            }
        }
        result
    }

    fn resolve(&self, error: NetworkError) -> DataTransferError {
        match self.error_resolver.resolve(&error) {
            Some(resolved) => DataTransferError::ResolvedNetworkFailure(resolved),
            None => DataTransferError::NetworkFailure(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::Requestable;
    use crate::network::NetworkResponse;
    use async_trait::async_trait;
    use serde::Deserialize;

    struct StubNetwork(fn() -> Result<NetworkResponse, NetworkError>);

    #[async_trait]
    impl NetworkService for StubNetwork {
        async fn request(
            &self,
            _endpoint: &dyn Requestable,
            _cancel: &CancellationToken,
        ) -> Result<NetworkResponse, NetworkError> {
            (self.0)()
        }
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Page {
        page: u32,
    }

    fn transfer(stub: fn() -> Result<NetworkResponse, NetworkError>) -> DataTransferService {
        DataTransferService::new(Arc::new(StubNetwork(stub)))
    }

    fn ok(data: &[u8]) -> Result<NetworkResponse, NetworkError> {
        Ok(NetworkResponse {
            status: 200,
            data: Some(data.to_vec()),
        })
    }

    #[tokio::test]
    async fn test_decodes_json() {
        let service = transfer(|| ok(br#"{"page":7}"#));
        let page = service
            .request(&Endpoint::<Page>::new("p"), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(page, Page { page: 7 });
    }

    #[tokio::test]
    async fn test_raw_bytes_pass_through() {
        let service = transfer(|| ok(&[0xff, 0xd8, 0x00]));
        let bytes = service
            .request(&Endpoint::raw("w92/x.jpg"), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(bytes, vec![0xff, 0xd8, 0x00]);
    }

    #[tokio::test]
    async fn test_decode_failure_is_parsing_error() {
        let service = transfer(|| ok(b"not json"));
        let error = service
            .request(&Endpoint::<Page>::new("p"), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(error, DataTransferError::Parsing(_)));
    }

    #[tokio::test]
    async fn test_missing_body_is_no_response() {
        let service = transfer(|| Ok(NetworkResponse { status: 204, data: None }));
        let error = service
            .request(&Endpoint::<Page>::new("p"), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(error, DataTransferError::NoResponse));
    }

    #[tokio::test]
    async fn test_unresolved_network_error_is_wrapped() {
        let service = transfer(|| Err(NetworkError::NotConnected));
        let error = service
            .request(&Endpoint::<Page>::new("p"), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(error, DataTransferError::NetworkFailure(NetworkError::NotConnected)));
    }

    struct UnauthorizedResolver;

    impl DataTransferErrorResolver for UnauthorizedResolver {
        fn resolve(&self, error: &NetworkError) -> Option<BoxError> {
            error.has_status_code(401).then(|| "invalid API key".into())
        }
    }

    #[tokio::test]
    async fn test_resolver_translates_known_errors() {
        let unauthorized: fn() -> Result<NetworkResponse, NetworkError> =
            || Err(NetworkError::Http { status_code: 401, data: None });
        let service = DataTransferService::with_error_resolver(
            Arc::new(StubNetwork(unauthorized)),
            Arc::new(UnauthorizedResolver),
        );
        let error = service
            .request(&Endpoint::<Page>::new("p"), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(error.to_string(), "invalid API key");

        let server_error: fn() -> Result<NetworkResponse, NetworkError> =
            || Err(NetworkError::Http { status_code: 500, data: None });
        let service = DataTransferService::with_error_resolver(
            Arc::new(StubNetwork(server_error)),
            Arc::new(UnauthorizedResolver),
        );
        let error = service
            .request(&Endpoint::<Page>::new("p"), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(error.network_error().map_or(false, |e| e.has_status_code(500)));
    }
}
