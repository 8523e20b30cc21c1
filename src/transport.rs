//! The HTTP transport seam.
//!
//! The client never talks to `reqwest` directly. It hands a [`TransportRequest`] to a
//! [`Transport`] and gets back a [`TransportResponse`] (any status) or a
//! [`TransportError`] when no response arrived at all. [`ReqwestTransport`] is the
//! default implementation; tests swap in scripted ones.

use async_trait::async_trait;
use http::{HeaderMap, Method, StatusCode};
use std::time::Duration;
use url::Url;

/// A single HTTP request ready to be sent.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// The HTTP method.
    pub method: Method,

    /// The absolute request URL.
    pub url: Url,

    /// Headers to send.
    pub headers: HeaderMap,

    /// Encoded JSON body, if any.
    pub body: Option<String>,
}

impl TransportRequest {
    /// Creates a request with no headers and no body.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Replaces the request headers.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the request body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// A completed HTTP exchange, whatever its status.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// The HTTP status code.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// The raw response body.
    pub body: String,
}

impl TransportResponse {
    /// Creates a response from its parts.
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<String>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }
}

/// The request never produced an HTTP response.
#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    /// The request or connection attempt timed out.
    #[error("Request timed out")]
    Timeout,

    /// A network-level error from `reqwest` (connection refused, DNS, TLS, ...).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Any other transport failure, for custom transports.
    #[error("{0}")]
    Other(String),
}

/// Sends one HTTP request and returns the response or a transport failure.
///
/// Implementations must return non-2xx responses as `Ok`; classifying them is the
/// client's job. They must be safe to share across tasks.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use gamma_sdk::transport::{Transport, TransportError, TransportRequest, TransportResponse};
/// use http::{HeaderMap, StatusCode};
///
/// struct AlwaysPending;
///
/// #[async_trait]
/// impl Transport for AlwaysPending {
///     async fn send(&self, _request: TransportRequest) -> Result<TransportResponse, TransportError> {
///         Ok(TransportResponse::new(
///             StatusCode::OK,
///             HeaderMap::new(),
///             r#"{"status":"pending","generationId":"gen-1"}"#,
///         ))
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request.
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

/// The default [`Transport`], backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    /// Builds a transport with an overall request timeout and a separate
    /// connection-establishment timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying `reqwest` client cannot be built.
    pub fn new(timeout: Duration, connect_timeout: Duration) -> crate::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| {
                crate::Error::Configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { http_client })
    }

    /// Wraps an already configured `reqwest::Client`.
    pub fn from_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let mut builder = self
            .http_client
            .request(request.method, request.url)
            .headers(request.headers);

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(map_reqwest_error)?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

fn map_reqwest_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_new() {
        let response = TransportResponse::new(StatusCode::ACCEPTED, HeaderMap::new(), "{}");

        assert_eq!(response.status, StatusCode::ACCEPTED);
        assert_eq!(response.body, "{}");
        assert!(response.headers.is_empty());
    }

    #[test]
    fn test_request_builder() {
        let url = Url::parse("https://example.com/v0.2/generations").unwrap();
        let request = TransportRequest::new(Method::POST, url).with_body("{}");

        assert_eq!(request.method, Method::POST);
        assert_eq!(request.body.as_deref(), Some("{}"));
        assert!(request.headers.is_empty());
    }
}
