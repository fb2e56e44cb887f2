use crate::observable::Observable;
use crate::poster_images_repository::PosterImagesRepository;
use movie_search_models::Movie;
use movie_search_network::CancellationToken;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Cancels whichever poster download is running when `cancel` is called
#[derive(Clone, Default)]
pub struct PosterLoadCancellation {
    current: Arc<Mutex<CancellationToken>>,
}

impl PosterLoadCancellation {
    pub fn cancel(&self) {
        if let Ok(token) = self.current.lock() {
            token.cancel();
        }
    }

    /// Fresh token for a new download; the previous download is cancelled
    fn begin(&self) -> CancellationToken {
        let token = CancellationToken::new();
        if let Ok(mut current) = self.current.lock() {
            current.cancel();
            *current = token.clone();
        }
        token
    }
}

pub struct MovieDetailsViewModel {
    poster_image_path: Option<String>,
    poster_images_repository: Arc<dyn PosterImagesRepository>,
    loaded_image_width: Option<u32>,
    cancellation: PosterLoadCancellation,

    pub title: String,
    pub overview: String,
    pub poster_image: Observable<Option<Vec<u8>>>,
}

impl MovieDetailsViewModel {
    pub fn new(movie: &Movie, poster_images_repository: Arc<dyn PosterImagesRepository>) -> Self {
        Self {
            poster_image_path: movie.poster_path.clone().filter(|p| !p.is_empty()),
            poster_images_repository,
            loaded_image_width: None,
            cancellation: PosterLoadCancellation::default(),
            title: movie.title.clone(),
            overview: movie.overview.clone(),
            poster_image: Observable::new(None),
        }
    }

    pub fn is_poster_image_hidden(&self) -> bool {
        self.poster_image_path.is_none()
    }

    /// Handle that aborts the running poster download, later downloads still start
    pub fn cancellation(&self) -> PosterLoadCancellation {
        self.cancellation.clone()
    }

    pub async fn update_poster_image(&mut self, width: u32) {
        let Some(path) = self.poster_image_path.clone() else {
            return;
        };
        if self.loaded_image_width == Some(width) {
            debug!("Poster {} already loaded at width {}", path, width);
            return;
        }

        let cancel = self.cancellation.begin();
        match self.poster_images_repository.fetch_image(&path, width, &cancel).await {
            Ok(data) => {
                self.loaded_image_width = Some(width);
                self.poster_image.set(Some(data));
            }
            Err(e) if e.is_cancelled() => debug!("Poster download cancelled"),
            Err(e) => warn!("Failed to load poster {}: {}", path, e),
        }
    }
}

impl Drop for MovieDetailsViewModel {
    fn drop(&mut self) {
        self.cancellation.cancel();
    }
}
