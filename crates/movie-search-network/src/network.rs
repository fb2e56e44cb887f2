use crate::endpoint::{Requestable, UrlRequest};
use crate::error::NetworkError;
use crate::network_config::NetworkConfigurable;
use crate::session::{NetworkSession, SessionError};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Successful exchange: any status below 400
#[derive(Debug, Clone)]
pub struct NetworkResponse {
    pub status: u16,
    pub data: Option<Vec<u8>>,
}

#[async_trait]
pub trait NetworkService: Send + Sync {
    /// Execute the request, racing it against `cancel`
    async fn request(
        &self,
        endpoint: &dyn Requestable,
        cancel: &CancellationToken,
    ) -> Result<NetworkResponse, NetworkError>;
}

pub struct DefaultNetworkService {
    session: Arc<dyn NetworkSession>,
    config: Arc<dyn NetworkConfigurable>,
    log_requests: bool,
}

impl DefaultNetworkService {
    pub fn new(session: Arc<dyn NetworkSession>, config: Arc<dyn NetworkConfigurable>) -> Self {
        Self {
            session,
            config,
            log_requests: false,
        }
    }

    /// Trace method, URL, headers and bodies at debug level
    pub fn with_request_logging(mut self, enabled: bool) -> Self {
        self.log_requests = enabled;
        self
    }

    fn log_request(&self, request: &UrlRequest) {
        if !self.log_requests {
            return;
        }
        debug!(
            method = request.method.as_str(),
            url = %request.url,
            headers = ?request.headers,
            "Sending request"
        );
        if let Some(body) = &request.body {
            debug!(body = %String::from_utf8_lossy(body), "Request body");
        }
    }

    fn log_response(&self, status: u16, data: Option<&[u8]>) {
        if !self.log_requests {
            return;
        }
        match data {
            Some(bytes) => match serde_json::from_slice::<serde_json::Value>(bytes) {
                Ok(json) => debug!(status, body = %json, "Received response"),
                Err(_) => debug!(status, bytes = bytes.len(), "Received binary response"),
            },
            None => debug!(status, "Received empty response"),
        }
    }

    fn log_error(&self, error: &NetworkError) {
        if self.log_requests {
            debug!(error = %error, "Request failed");
        }
    }
}

#[async_trait]
impl NetworkService for DefaultNetworkService {
    async fn request(
        &self,
        endpoint: &dyn Requestable,
        cancel: &CancellationToken,
    ) -> Result<NetworkResponse, NetworkError> {
        let request = match endpoint.url_request(self.config.as_ref()) {
            Ok(request) => request,
            Err(e) => {
                warn!(path = endpoint.path(), error = %e, "Could not generate request URL");
                return Err(NetworkError::UrlGeneration(e));
            }
        };

        if cancel.is_cancelled() {
            return Err(NetworkError::Cancelled);
        }

        self.log_request(&request);

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(SessionError::Cancelled),
            result = self.session.load_data(&request) => result,
        };

        let result = match outcome {
            Ok(response) if (400..600).contains(&response.status) => Err(NetworkError::Http {
                status_code: response.status,
                data: response.data,
            }),
            Ok(response) => {
                self.log_response(response.status, response.data.as_deref());
                Ok(NetworkResponse {
                    status: response.status,
                    data: response.data,
                })
            }
            Err(SessionError::NotConnected) => Err(NetworkError::NotConnected),
            Err(SessionError::Cancelled) => Err(NetworkError::Cancelled),
            Err(SessionError::Failed(e)) => Err(NetworkError::Request(e)),
        };

        if let Err(e) = &result {
            self.log_error(e);
        }
        result
    }
}
