//! Transport layer for CodeAuth API calls.
//!
//! Every operation is a single blocking HTTP POST with a JSON body. The
//! transport only classifies the outcome: a parsed response object, or a
//! [`TransportError`] when no usable response came back.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::Value;
use thiserror::Error;

use crate::types::{ErrorCode, JsonObject};

/// Errors that prevent a request from producing a response object.
///
/// The facade reports all of them as [`ErrorCode::ConnectionError`].
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    /// The endpoint and path did not form a valid URL.
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    /// The request body is not a JSON object.
    #[error("invalid request body: {0}")]
    InvalidRequest(String),

    /// The request could not be sent or no response arrived.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response headers arrived but the body could not be read.
    #[error("failed to read response body: {0}")]
    Body(reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The response was valid JSON but not an object.
    #[error("unexpected response body: {0}")]
    UnexpectedBody(String),
}

impl TransportError {
    /// Wire code reported for this failure.
    pub fn code(&self) -> ErrorCode {
        ErrorCode::ConnectionError
    }
}

/// A way of delivering one request to the service.
///
/// Implementations perform exactly one call per invocation, never retry, and
/// on HTTP 200 set the returned object's `error` field to `"no_error"`.
pub trait Transport: Send + Sync {
    /// POST `body` to `path` on `endpoint` and return the response object.
    fn post(
        &self,
        endpoint: &str,
        path: &str,
        body: &JsonObject,
    ) -> Result<JsonObject, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn post(
        &self,
        endpoint: &str,
        path: &str,
        body: &JsonObject,
    ) -> Result<JsonObject, TransportError> {
        (**self).post(endpoint, path, body)
    }
}

/// Configuration for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// URL scheme placed in front of the endpoint.
    pub scheme: String,
    /// Custom user agent.
    pub user_agent: Option<String>,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            user_agent: None,
        }
    }
}

impl HttpTransportConfig {
    /// Create a config using HTTPS.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the URL scheme (`https` unless talking to a local test server).
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Set a custom user agent.
    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }
}

/// Blocking HTTP transport backed by `reqwest`.
///
/// Must not be built or dropped from inside an async runtime.
#[derive(Clone)]
pub struct HttpTransport {
    /// HTTP client (shared for connection reuse).
    client: Arc<reqwest::blocking::Client>,
    /// Transport configuration.
    config: HttpTransportConfig,
}

impl HttpTransport {
    /// Create a transport with the given configuration.
    pub fn new(config: HttpTransportConfig) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let user_agent = config
            .user_agent
            .clone()
            .unwrap_or_else(|| format!("codeauth-client/{}", env!("CARGO_PKG_VERSION")));

        let client = reqwest::blocking::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        tracing::debug!(scheme = %config.scheme, "created HTTP transport");

        Ok(Self {
            client: Arc::new(client),
            config,
        })
    }

    /// Get the transport configuration.
    pub fn config(&self) -> &HttpTransportConfig {
        &self.config
    }

    /// Build the request URL for a path on an endpoint.
    pub fn url(&self, endpoint: &str, path: &str) -> Result<url::Url, TransportError> {
        let raw = format!("{}://{}{}", self.config.scheme, endpoint, path);
        url::Url::parse(&raw).map_err(|source| TransportError::InvalidUrl { url: raw, source })
    }
}

impl Transport for HttpTransport {
    fn post(
        &self,
        endpoint: &str,
        path: &str,
        body: &JsonObject,
    ) -> Result<JsonObject, TransportError> {
        let url = self.url(endpoint, path)?;
        let json = serde_json::to_vec(body)?;

        tracing::trace!(url = %url, "sending CodeAuth request");

        let response = self.client.post(url).body(json).send()?;
        let status = response.status();
        let bytes = response.bytes().map_err(TransportError::Body)?;

        tracing::trace!(path = %path, status = status.as_u16(), "received CodeAuth response");

        let mut object = match serde_json::from_slice::<Value>(&bytes)? {
            Value::Object(object) => object,
            other => {
                return Err(TransportError::UnexpectedBody(format!(
                    "expected a JSON object, got {}",
                    other
                )));
            }
        };

        if status == reqwest::StatusCode::OK {
            object.insert(
                "error".to_string(),
                Value::String(ErrorCode::NoError.as_str().to_string()),
            );
        }

        Ok(object)
    }
}
