use crate::error::RepositoryError;
use async_trait::async_trait;
use movie_search_network::tmdb::APIEndpoints;
use movie_search_network::{CancellationToken, DataTransferError, DataTransferService};
use tracing::debug;

#[async_trait]
pub trait PosterImagesRepository: Send + Sync {
    async fn fetch_image(
        &self,
        image_path: &str,
        width: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, RepositoryError>;
}

pub struct DefaultPosterImagesRepository {
    data_transfer: DataTransferService,
    not_found_placeholder: Option<Vec<u8>>,
}

impl DefaultPosterImagesRepository {
    pub fn new(data_transfer: DataTransferService) -> Self {
        Self {
            data_transfer,
            not_found_placeholder: None,
        }
    }

    /// Bytes returned instead of an error when the image service answers 404
    pub fn with_not_found_placeholder(mut self, placeholder: Vec<u8>) -> Self {
        self.not_found_placeholder = Some(placeholder);
        self
    }
}

#[async_trait]
impl PosterImagesRepository for DefaultPosterImagesRepository {
    async fn fetch_image(
        &self,
        image_path: &str,
        width: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, RepositoryError> {
        let endpoint = APIEndpoints::movie_poster(image_path, width);
        match self.data_transfer.request(&endpoint, cancel).await {
            Ok(data) => Ok(data),
            Err(DataTransferError::NetworkFailure(e)) if e.is_not_found() => match &self.not_found_placeholder {
                Some(placeholder) => {
                    debug!("Poster {} not found, using placeholder", image_path);
                    Ok(placeholder.clone())
                }
                None => Err(DataTransferError::NetworkFailure(e).into()),
            },
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ok, transfer, StubNetwork};
    use movie_search_network::NetworkError;

    fn not_found() -> Result<movie_search_network::NetworkResponse, NetworkError> {
        Err(NetworkError::Http {
            status_code: 404,
            data: None,
        })
    }

    #[tokio::test]
    async fn test_fetches_bucketed_path() {
        let network = StubNetwork::new(|endpoint| ok(endpoint.path().as_bytes().to_vec()));
        let repository = DefaultPosterImagesRepository::new(transfer(&network));

        let bytes = repository
            .fetch_image("/poster.jpg", 200, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(bytes, b"w185/poster.jpg".to_vec());
    }

    #[tokio::test]
    async fn test_not_found_uses_placeholder() {
        let network = StubNetwork::new(|_| not_found());
        let repository =
            DefaultPosterImagesRepository::new(transfer(&network)).with_not_found_placeholder(vec![0u8; 4]);

        let bytes = repository
            .fetch_image("/gone.jpg", 92, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(bytes, vec![0u8; 4]);
    }

    #[tokio::test]
    async fn test_not_found_without_placeholder_is_an_error() {
        let network = StubNetwork::new(|_| not_found());
        let repository = DefaultPosterImagesRepository::new(transfer(&network));

        let error = repository
            .fetch_image("/gone.jpg", 92, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            RepositoryError::DataTransfer(DataTransferError::NetworkFailure(NetworkError::Http { status_code: 404, .. }))
        ));
    }
}
