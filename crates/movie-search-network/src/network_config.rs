use crate::error::RequestGenerationError;
use reqwest::Url;
use std::collections::BTreeMap;

/// Network-level defaults applied to every request of one service
pub trait NetworkConfigurable: Send + Sync {
    fn base_url(&self) -> &Url;
    fn headers(&self) -> &BTreeMap<String, String>;
    fn query_parameters(&self) -> &BTreeMap<String, String>;
}

#[derive(Debug, Clone)]
pub struct ApiDataNetworkConfig {
    base_url: Url,
    headers: BTreeMap<String, String>,
    query_parameters: BTreeMap<String, String>,
}

impl ApiDataNetworkConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            headers: BTreeMap::new(),
            query_parameters: BTreeMap::new(),
        }
    }

    pub fn parse(base_url: &str) -> Result<Self, RequestGenerationError> {
        let url = Url::parse(base_url)
            .map_err(|e| RequestGenerationError::Components(format!("{}: {}", base_url, e)))?;
        Ok(Self::new(url))
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn with_query_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_parameters.insert(key.into(), value.into());
        self
    }
}

impl NetworkConfigurable for ApiDataNetworkConfig {
    fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    fn query_parameters(&self) -> &BTreeMap<String, String> {
        &self.query_parameters
    }
}
