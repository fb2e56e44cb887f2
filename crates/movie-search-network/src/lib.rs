pub mod endpoint;
pub mod error;
pub mod network;
pub mod network_config;
pub mod session;
pub mod tmdb;
pub mod transfer;

pub use endpoint::{BodyEncoding, Endpoint, HttpMethod, JsonResponseDecoder, RawDataResponseDecoder, Requestable, ResponseDecoder, UrlRequest};
pub use error::{ConnectionError, DataTransferError, NetworkError, RequestGenerationError};
pub use network::{DefaultNetworkService, NetworkResponse, NetworkService};
pub use network_config::{ApiDataNetworkConfig, NetworkConfigurable};
pub use session::{NetworkSession, ReqwestNetworkSession, SessionError, SessionResponse};
pub use transfer::{DataTransferErrorResolver, DataTransferService, DefaultDataTransferErrorResolver};

/// Cancellation handle shared by every layer of a request
pub use tokio_util::sync::CancellationToken;
