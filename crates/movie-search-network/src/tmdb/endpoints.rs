use super::dto::{MoviesRequestDto, MoviesResponseDto};
use crate::endpoint::Endpoint;

/// Poster widths served by the image CDN, ascending
pub const POSTER_WIDTHS: [u32; 6] = [92, 154, 185, 342, 500, 780];

pub struct APIEndpoints;

impl APIEndpoints {
    pub fn movies(request: &MoviesRequestDto) -> Endpoint<MoviesResponseDto> {
        Endpoint::new("search/movie")
            .query_parameter("query", &request.query)
            .query_parameter("page", request.page)
    }

    /// Resolved against the image service base URL, not the API one
    pub fn movie_poster(poster_path: &str, width: u32) -> Endpoint<Vec<u8>> {
        let bucket = closest_poster_width(width);
        Endpoint::raw(format!("w{}{}", bucket, poster_path))
    }
}

/// Nearest supported width. Ties resolve to the larger bucket (closest-or-next-largest).
pub fn closest_poster_width(width: u32) -> u32 {
    let mut best = POSTER_WIDTHS[0];
    for candidate in POSTER_WIDTHS {
        if candidate.abs_diff(width) <= best.abs_diff(width) {
            best = candidate;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::{HttpMethod, Requestable};
    use crate::network_config::ApiDataNetworkConfig;

    #[test]
    fn test_closest_poster_width() {
        assert_eq!(closest_poster_width(0), 92);
        assert_eq!(closest_poster_width(92), 92);
        assert_eq!(closest_poster_width(100), 92);
        assert_eq!(closest_poster_width(150), 154);
        assert_eq!(closest_poster_width(300), 342);
        assert_eq!(closest_poster_width(421), 500);
        assert_eq!(closest_poster_width(4000), 780);
    }

    #[test]
    fn test_ties_prefer_larger_bucket() {
        // 123 is exactly between 92 and 154
        assert_eq!(closest_poster_width(123), 154);
        assert_eq!(closest_poster_width(640), 780);
    }

    #[test]
    fn test_movies_endpoint() {
        let config = ApiDataNetworkConfig::parse("https://api.themoviedb.org/3/")
            .unwrap()
            .with_query_parameter("api_key", "abc");
        let endpoint = APIEndpoints::movies(&MoviesRequestDto {
            query: "matrix".to_string(),
            page: 2,
        });

        assert_eq!(endpoint.method(), HttpMethod::Get);
        let url = endpoint.url(&config).unwrap();
        assert_eq!(url.path(), "/3/search/movie");
        let pairs: Vec<(String, String)> = url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect();
        assert!(pairs.contains(&("api_key".to_string(), "abc".to_string())));
        assert!(pairs.contains(&("query".to_string(), "matrix".to_string())));
        assert!(pairs.contains(&("page".to_string(), "2".to_string())));
    }

    #[test]
    fn test_poster_endpoint() {
        let config = ApiDataNetworkConfig::parse("https://image.tmdb.org/t/p/").unwrap();
        let endpoint = APIEndpoints::movie_poster("/abc.jpg", 300);
        let url = endpoint.url(&config).unwrap();
        assert_eq!(url.as_str(), "https://image.tmdb.org/t/p/w342/abc.jpg");
        assert_eq!(endpoint.response_decoder().decode(b"png").unwrap(), b"png".to_vec());
    }
}
