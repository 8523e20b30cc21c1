//! Error types for Gamma API calls.
//!
//! Every failure the SDK can surface is a variant of [`Error`]. HTTP failures are
//! reduced to an [`ApiError`] that keeps the status code, the decoded body and the
//! server's Retry-After hint, so callers can branch on them programmatically.

use crate::transport::TransportError;
use http::{HeaderMap, StatusCode};
use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;

/// The kind of a classified HTTP failure.
///
/// Each non-2xx status maps to exactly one kind; see [`ErrorKind::from_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 400
    BadRequest,
    /// 401
    Unauthorized,
    /// 403
    Forbidden,
    /// 404
    NotFound,
    /// 422
    Unprocessable,
    /// 429. Carries a Retry-After hint when the server sends one.
    TooManyRequests,
    /// Any 5xx.
    ServerError,
    /// Any other non-2xx status.
    Generic,
}

impl ErrorKind {
    /// Maps a status code to its error kind.
    ///
    /// Returns `None` for 2xx statuses, which are not errors.
    ///
    /// # Examples
    ///
    /// ```
    /// use gamma_sdk::ErrorKind;
    /// use http::StatusCode;
    ///
    /// assert_eq!(ErrorKind::from_status(StatusCode::OK), None);
    /// assert_eq!(
    ///     ErrorKind::from_status(StatusCode::BAD_GATEWAY),
    ///     Some(ErrorKind::ServerError)
    /// );
    /// ```
    pub fn from_status(status: StatusCode) -> Option<Self> {
        if status.is_success() {
            return None;
        }

        let kind = match status.as_u16() {
            400 => ErrorKind::BadRequest,
            401 => ErrorKind::Unauthorized,
            403 => ErrorKind::Forbidden,
            404 => ErrorKind::NotFound,
            422 => ErrorKind::Unprocessable,
            429 => ErrorKind::TooManyRequests,
            500..=599 => ErrorKind::ServerError,
            _ => ErrorKind::Generic,
        };
        Some(kind)
    }

    /// Returns `true` for the kinds the client retries: 429 and 5xx.
    pub fn is_transient(self) -> bool {
        matches!(self, ErrorKind::TooManyRequests | ErrorKind::ServerError)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::BadRequest => "bad request",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::NotFound => "not found",
            ErrorKind::Unprocessable => "unprocessable entity",
            ErrorKind::TooManyRequests => "too many requests",
            ErrorKind::ServerError => "server error",
            ErrorKind::Generic => "API error",
        };
        f.write_str(name)
    }
}

/// A non-2xx response reduced to its kind, status, message and decoded body.
#[derive(thiserror::Error, Debug, Clone)]
#[error("HTTP {status} ({kind}): {message}")]
pub struct ApiError {
    /// The classified kind.
    pub kind: ErrorKind,
    /// The HTTP status code, verbatim.
    pub status: StatusCode,
    /// Human-readable message taken from the body, or a generic fallback.
    pub message: String,
    /// The decoded JSON object body, if the body was a JSON object.
    pub body: Option<Map<String, Value>>,
    /// Server-suggested wait, only ever set for [`ErrorKind::TooManyRequests`].
    pub retry_after: Option<Duration>,
    /// The response headers.
    pub headers: HeaderMap,
}

/// The main error type for Gamma API calls.
///
/// # Examples
///
/// ```no_run
/// use gamma_sdk::{Error, ErrorKind, GammaClient};
///
/// # async fn example() -> Result<(), Error> {
/// let client = GammaClient::builder().build()?;
///
/// match client.get_generation("gen-123").await {
///     Ok(status) => println!("Status: {:?}", status),
///     Err(Error::Api(e)) if e.kind == ErrorKind::NotFound => {
///         eprintln!("No such generation: {}", e.message);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The request builder or a call argument was misused. Never retried.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// The transport failed before an HTTP response was received.
    ///
    /// Retried inside `get_generation`'s budget only.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The server answered with a non-2xx status.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A successful response broke the API contract (missing id or URL,
    /// unknown status string, body that is not a JSON object).
    #[error("Protocol violation (status {status}): {message}")]
    Protocol {
        /// What was wrong with the response
        message: String,
        /// The HTTP status code of the offending response
        status: StatusCode,
        /// The decoded body, when it was a JSON object
        body: Option<Map<String, Value>>,
    },

    /// The polling deadline passed before the generation completed.
    #[error("Polling timed out after {}s for generation {generation_id}", .timeout.as_secs())]
    PollTimeout {
        /// The generation that was being polled
        generation_id: String,
        /// The configured polling timeout
        timeout: Duration,
    },

    /// Invalid client configuration, such as a bad header value.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The request payload could not be encoded as JSON.
    #[error("Failed to serialize request: {0}")]
    SerializationFailed(String),

    /// The configured base URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Returns `true` if `get_generation` would retry this error.
    ///
    /// Transport failures, 429 and 5xx responses are retryable. Everything
    /// else, including protocol violations, is not.
    ///
    /// # Examples
    ///
    /// ```
    /// use gamma_sdk::{ApiError, Error, ErrorKind};
    /// use http::{HeaderMap, StatusCode};
    ///
    /// let err = Error::Api(ApiError {
    ///     kind: ErrorKind::ServerError,
    ///     status: StatusCode::INTERNAL_SERVER_ERROR,
    ///     message: "boom".to_string(),
    ///     body: None,
    ///     retry_after: None,
    ///     headers: HeaderMap::new(),
    /// });
    /// assert!(err.is_retryable());
    ///
    /// assert!(!Error::Validation("bad".to_string()).is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(_) => true,
            Error::Api(e) => e.kind.is_transient(),
            Error::Validation(_)
            | Error::Protocol { .. }
            | Error::PollTimeout { .. }
            | Error::Configuration(_)
            | Error::SerializationFailed(_)
            | Error::InvalidUrl(_) => false,
        }
    }

    /// Returns the classified kind for HTTP failures.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Error::Api(e) => Some(e.kind),
            _ => None,
        }
    }

    /// Returns the HTTP status code if this error came from a response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api(e) => Some(e.status),
            Error::Protocol { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the decoded JSON body if this error came from a response.
    pub fn body(&self) -> Option<&Map<String, Value>> {
        match self {
            Error::Api(e) => e.body.as_ref(),
            Error::Protocol { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Returns the server's Retry-After hint, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Error::Api(e) => e.retry_after,
            _ => None,
        }
    }
}

/// A specialized `Result` type for Gamma API calls.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (400, ErrorKind::BadRequest),
            (401, ErrorKind::Unauthorized),
            (403, ErrorKind::Forbidden),
            (404, ErrorKind::NotFound),
            (422, ErrorKind::Unprocessable),
            (429, ErrorKind::TooManyRequests),
            (500, ErrorKind::ServerError),
            (503, ErrorKind::ServerError),
            (599, ErrorKind::ServerError),
            (302, ErrorKind::Generic),
            (409, ErrorKind::Generic),
            (418, ErrorKind::Generic),
        ];

        for (code, expected) in cases {
            let status = StatusCode::from_u16(code).unwrap();
            assert_eq!(ErrorKind::from_status(status), Some(expected), "{}", code);
        }
    }

    #[test]
    fn test_success_range_is_not_an_error() {
        for code in 200..300 {
            let status = StatusCode::from_u16(code).unwrap();
            assert_eq!(ErrorKind::from_status(status), None);
        }
    }

    #[test]
    fn test_protocol_error_is_not_retryable() {
        let err = Error::Protocol {
            message: "generationId missing from response".to_string(),
            status: StatusCode::OK,
            body: None,
        };
        assert!(!err.is_retryable());
        assert_eq!(err.status(), Some(StatusCode::OK));
        assert_eq!(err.kind(), None);
    }

    #[test]
    fn test_poll_timeout_message() {
        let err = Error::PollTimeout {
            generation_id: "gen-1".to_string(),
            timeout: Duration::from_secs(30),
        };
        assert_eq!(
            err.to_string(),
            "Polling timed out after 30s for generation gen-1"
        );
    }
}
