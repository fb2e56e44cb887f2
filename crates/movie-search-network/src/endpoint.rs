use crate::error::RequestGenerationError;
use crate::network_config::NetworkConfigurable;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Head => reqwest::Method::HEAD,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    Json,
    FormUrlEncoded,
}

/// A fully resolved request, independent of the transport that executes it
#[derive(Debug, Clone)]
pub struct UrlRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Vec<u8>>,
}

/// Anything that can describe one HTTP request
pub trait Requestable: Send + Sync {
    fn path(&self) -> &str;
    fn is_full_path(&self) -> bool;
    fn method(&self) -> HttpMethod;
    fn query_parameters(&self) -> &BTreeMap<String, String>;
    fn header_parameters(&self) -> &BTreeMap<String, String>;
    fn body_parameters(&self) -> &Map<String, Value>;
    fn body_encoding(&self) -> BodyEncoding;

    /// Resolve the full URL against the network configuration
    ///
    /// Network-level query parameters are applied first, endpoint parameters
    /// override them on key collision.
    fn url(&self, config: &dyn NetworkConfigurable) -> Result<Url, RequestGenerationError> {
        let endpoint = if self.is_full_path() {
            self.path().to_string()
        } else {
            let base = config.base_url().as_str();
            let separator = if base.ends_with('/') { "" } else { "/" };
            format!("{}{}{}", base, separator, self.path().trim_start_matches('/'))
        };

        let mut url = Url::parse(&endpoint)
            .map_err(|e| RequestGenerationError::Components(format!("{}: {}", endpoint, e)))?;
        if url.cannot_be_a_base() {
            return Err(RequestGenerationError::Components(endpoint));
        }

        let mut query: BTreeMap<&str, &str> = config
            .query_parameters()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        for (key, value) in self.query_parameters() {
            query.insert(key.as_str(), value.as_str());
        }

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        Ok(url)
    }

    fn url_request(&self, config: &dyn NetworkConfigurable) -> Result<UrlRequest, RequestGenerationError> {
        let url = self.url(config)?;

        let mut headers = config.headers().clone();
        for (key, value) in self.header_parameters() {
            headers.insert(key.clone(), value.clone());
        }

        let body = if self.body_parameters().is_empty() {
            None
        } else {
            encode_body(self.body_parameters(), self.body_encoding())
        };

        Ok(UrlRequest {
            method: self.method(),
            url,
            headers,
            body,
        })
    }
}

fn encode_body(parameters: &Map<String, Value>, encoding: BodyEncoding) -> Option<Vec<u8>> {
    match encoding {
        BodyEncoding::Json => serde_json::to_vec(parameters).ok(),
        BodyEncoding::FormUrlEncoded => {
            let form = parameters
                .iter()
                .map(|(key, value)| {
                    let value = match value {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    format!("{}={}", urlencoding::encode(key), urlencoding::encode(&value))
                })
                .collect::<Vec<_>>()
                .join("&");
            Some(form.into_bytes())
        }
    }
}

/// Turns raw response bytes into a typed value
pub trait ResponseDecoder<T>: Send + Sync {
    fn decode(&self, data: &[u8]) -> Result<T, BoxError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonResponseDecoder;

impl<T: DeserializeOwned> ResponseDecoder<T> for JsonResponseDecoder {
    fn decode(&self, data: &[u8]) -> Result<T, BoxError> {
        Ok(serde_json::from_slice(data)?)
    }
}

/// Hands the bytes back unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct RawDataResponseDecoder;

impl ResponseDecoder<Vec<u8>> for RawDataResponseDecoder {
    fn decode(&self, data: &[u8]) -> Result<Vec<u8>, BoxError> {
        Ok(data.to_vec())
    }
}

/// Request descriptor whose response decodes into `R`
pub struct Endpoint<R> {
    path: String,
    is_full_path: bool,
    method: HttpMethod,
    query_parameters: BTreeMap<String, String>,
    header_parameters: BTreeMap<String, String>,
    body_parameters: Map<String, Value>,
    body_encoding: BodyEncoding,
    response_decoder: Arc<dyn ResponseDecoder<R>>,
}

impl<R: DeserializeOwned + 'static> Endpoint<R> {
    /// GET endpoint relative to the base URL, decoding JSON
    pub fn new(path: impl Into<String>) -> Self {
        Self::with_decoder(path, Arc::new(JsonResponseDecoder))
    }
}

impl Endpoint<Vec<u8>> {
    /// GET endpoint whose response is returned as raw bytes
    pub fn raw(path: impl Into<String>) -> Self {
        Self::with_decoder(path, Arc::new(RawDataResponseDecoder))
    }
}

impl<R> Endpoint<R> {
    pub fn with_decoder(path: impl Into<String>, response_decoder: Arc<dyn ResponseDecoder<R>>) -> Self {
        Self {
            path: path.into(),
            is_full_path: false,
            method: HttpMethod::Get,
            query_parameters: BTreeMap::new(),
            header_parameters: BTreeMap::new(),
            body_parameters: Map::new(),
            body_encoding: BodyEncoding::Json,
            response_decoder,
        }
    }

    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Treat the path as an absolute URL, ignoring the configured base
    pub fn full_path(mut self) -> Self {
        self.is_full_path = true;
        self
    }

    pub fn query_parameter(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query_parameters.insert(key.into(), value.to_string());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.header_parameters.insert(key.into(), value.into());
        self
    }

    pub fn body_parameter(mut self, key: impl Into<String>, value: Value) -> Self {
        self.body_parameters.insert(key.into(), value);
        self
    }

    pub fn with_body_encoding(mut self, encoding: BodyEncoding) -> Self {
        self.body_encoding = encoding;
        self
    }

    pub fn response_decoder(&self) -> &dyn ResponseDecoder<R> {
        self.response_decoder.as_ref()
    }
}

impl<R> Clone for Endpoint<R> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            is_full_path: self.is_full_path,
            method: self.method,
            query_parameters: self.query_parameters.clone(),
            header_parameters: self.header_parameters.clone(),
            body_parameters: self.body_parameters.clone(),
            body_encoding: self.body_encoding,
            response_decoder: Arc::clone(&self.response_decoder),
        }
    }
}

impl<R> fmt::Debug for Endpoint<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("path", &self.path)
            .field("is_full_path", &self.is_full_path)
            .field("method", &self.method)
            .field("query_parameters", &self.query_parameters)
            .field("header_parameters", &self.header_parameters)
            .finish_non_exhaustive()
    }
}

impl<R> Requestable for Endpoint<R> {
    fn path(&self) -> &str {
        &self.path
    }

    fn is_full_path(&self) -> bool {
        self.is_full_path
    }

    fn method(&self) -> HttpMethod {
        self.method
    }

    fn query_parameters(&self) -> &BTreeMap<String, String> {
        &self.query_parameters
    }

    fn header_parameters(&self) -> &BTreeMap<String, String> {
        &self.header_parameters
    }

    fn body_parameters(&self) -> &Map<String, Value> {
        &self.body_parameters
    }

    fn body_encoding(&self) -> BodyEncoding {
        self.body_encoding
    }
}
