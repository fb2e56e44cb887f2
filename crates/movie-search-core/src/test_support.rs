use async_trait::async_trait;
use movie_search_network::{
    CancellationToken, DataTransferService, NetworkError, NetworkResponse, NetworkService, Requestable,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

type Handler = Box<dyn Fn(&dyn Requestable) -> Result<NetworkResponse, NetworkError> + Send + Sync>;

/// Scripted network: answers every request through `handler`, optionally after a delay
pub(crate) struct StubNetwork {
    handler: Handler,
    delay: Duration,
    calls: AtomicUsize,
}

impl StubNetwork {
    pub(crate) fn new(
        handler: impl Fn(&dyn Requestable) -> Result<NetworkResponse, NetworkError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Self::with_delay(Duration::ZERO, handler)
    }

    pub(crate) fn with_delay(
        delay: Duration,
        handler: impl Fn(&dyn Requestable) -> Result<NetworkResponse, NetworkError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            handler: Box::new(handler),
            delay,
            calls: AtomicUsize::new(0),
        })
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NetworkService for StubNetwork {
    async fn request(
        &self,
        endpoint: &dyn Requestable,
        cancel: &CancellationToken,
    ) -> Result<NetworkResponse, NetworkError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::select! {
                _ = cancel.cancelled() => return Err(NetworkError::Cancelled),
                _ = tokio::time::sleep(self.delay) => {}
            }
        }
        (self.handler)(endpoint)
    }
}

pub(crate) fn transfer(network: &Arc<StubNetwork>) -> DataTransferService {
    DataTransferService::new(network.clone())
}

pub(crate) fn ok(data: Vec<u8>) -> Result<NetworkResponse, NetworkError> {
    Ok(NetworkResponse {
        status: 200,
        data: Some(data),
    })
}

/// Search response body with one movie per id, titled "Movie {id}"
pub(crate) fn page_json(page: u32, total_pages: u32, ids: &[u64]) -> Vec<u8> {
    let results: Vec<serde_json::Value> = ids
        .iter()
        .map(|id| {
            serde_json::json!({
                "id": id,
                "title": format!("Movie {}", id),
                "poster_path": format!("/{}.jpg", id),
                "overview": "",
                "release_date": "2020-01-02"
            })
        })
        .collect();
    serde_json::to_vec(&serde_json::json!({
        "page": page,
        "total_pages": total_pages,
        "results": results
    }))
    .unwrap()
}

/// Page number requested by a search endpoint
pub(crate) fn requested_page(endpoint: &dyn Requestable) -> u32 {
    endpoint
        .query_parameters()
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(0)
}
