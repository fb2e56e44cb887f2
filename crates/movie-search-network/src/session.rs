use crate::endpoint::UrlRequest;
use async_trait::async_trait;
use reqwest::Client;
use std::io;
use std::sync::Arc;
use thiserror::Error;

/// Raw outcome of a completed exchange, before status classification
#[derive(Debug, Clone)]
pub struct SessionResponse {
    pub status: u16,
    pub data: Option<Vec<u8>>,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("host unreachable")]
    NotConnected,
    #[error("cancelled")]
    Cancelled,
    #[error(transparent)]
    Failed(Box<dyn std::error::Error + Send + Sync>),
}

/// Transport that executes a resolved request
#[async_trait]
pub trait NetworkSession: Send + Sync {
    async fn load_data(&self, request: &UrlRequest) -> Result<SessionResponse, SessionError>;
}

#[derive(Clone)]
pub struct ReqwestNetworkSession {
    client: Arc<Client>,
}

impl ReqwestNetworkSession {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("moviesearch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

#[async_trait]
impl NetworkSession for ReqwestNetworkSession {
    async fn load_data(&self, request: &UrlRequest) -> Result<SessionResponse, SessionError> {
        let mut builder = self.client.request(request.method.into(), request.url.clone());
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(classify)?;

        Ok(SessionResponse {
            status,
            data: if bytes.is_empty() { None } else { Some(bytes.to_vec()) },
        })
    }
}

fn classify(error: reqwest::Error) -> SessionError {
    if is_unreachable(&error) {
        SessionError::NotConnected
    } else {
        SessionError::Failed(Box::new(error))
    }
}

/// True only when some cause in the chain says the network itself is unreachable.
/// DNS, TLS, refused connections and timeouts are ordinary request failures.
fn is_unreachable(error: &(dyn std::error::Error + 'static)) -> bool {
    let mut cause = Some(error);
    while let Some(current) = cause {
        if let Some(io_error) = current.downcast_ref::<io::Error>() {
            if matches!(
                io_error.kind(),
                io::ErrorKind::NetworkUnreachable | io::ErrorKind::HostUnreachable | io::ErrorKind::NetworkDown
            ) {
                return true;
            }
        }
        cause = current.source();
    }
    false
}
