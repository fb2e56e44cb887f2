pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{ApiConfig, Config, LoggingConfig, NetworkConfig, StorageConfig, DEFAULT_API_BASE_URL, DEFAULT_IMAGE_BASE_URL};
pub use credentials::{CredentialStore, API_KEY_ENV_VAR};
pub use paths::{PathManager, container_base_path};
