//! Turns raw HTTP responses into typed outcomes.
//!
//! [`classify`] passes 2xx responses through and reduces everything else to an
//! [`ApiError`]. Body decoding never fails here; a body that is not a JSON object
//! simply yields no structured body.

use crate::{ApiError, Error, ErrorKind, Result, TransportResponse};
use http::HeaderMap;
use serde_json::{Map, Value};
use std::time::{Duration, SystemTime};

/// Message used when the error body has no usable message field.
pub const FALLBACK_MESSAGE: &str = "Gamma API error";

const MESSAGE_FIELDS: [&str; 3] = ["message", "error", "detail"];

/// Passes successful responses through and classifies failures.
///
/// # Examples
///
/// ```
/// use gamma_sdk::{classify::classify, Error, ErrorKind, TransportResponse};
/// use http::{HeaderMap, StatusCode};
///
/// let response = TransportResponse::new(
///     StatusCode::NOT_FOUND,
///     HeaderMap::new(),
///     r#"{"message":"Missing"}"#,
/// );
///
/// match classify(response) {
///     Err(Error::Api(e)) => {
///         assert_eq!(e.kind, ErrorKind::NotFound);
///         assert_eq!(e.message, "Missing");
///     }
///     other => panic!("unexpected: {:?}", other),
/// }
/// ```
pub fn classify(response: TransportResponse) -> Result<TransportResponse> {
    let Some(kind) = ErrorKind::from_status(response.status) else {
        return Ok(response);
    };

    let body = decode_object(&response.body);
    let message = body
        .as_ref()
        .and_then(error_message)
        .unwrap_or(FALLBACK_MESSAGE)
        .to_string();

    let retry_after = if kind == ErrorKind::TooManyRequests {
        parse_retry_after(&response.headers)
    } else {
        None
    };

    match kind {
        ErrorKind::ServerError | ErrorKind::TooManyRequests => tracing::warn!(
            status = response.status.as_u16(),
            message = %message,
            "Transient API error"
        ),
        _ => tracing::error!(
            status = response.status.as_u16(),
            message = %message,
            "API request rejected"
        ),
    }

    Err(Error::Api(ApiError {
        kind,
        status: response.status,
        message,
        body,
        retry_after,
        headers: response.headers,
    }))
}

/// Picks the human-readable message out of an error body.
///
/// Checks `message`, `error` and `detail` in that order; the first string value wins.
pub fn error_message(body: &Map<String, Value>) -> Option<&str> {
    MESSAGE_FIELDS
        .iter()
        .find_map(|field| body.get(*field).and_then(Value::as_str))
}

/// Parses the Retry-After header.
///
/// An all-digit value is a number of seconds. Anything else is read as an HTTP
/// date; dates in the past and unparseable values yield no hint.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let header = headers.get(http::header::RETRY_AFTER)?.to_str().ok()?.trim();
    if header.is_empty() {
        return None;
    }

    if header.bytes().all(|b| b.is_ascii_digit()) {
        return header.parse::<u64>().ok().map(Duration::from_secs);
    }

    let date_time = httpdate::parse_http_date(header).ok()?;
    match date_time.duration_since(SystemTime::now()) {
        Ok(delta) if !delta.is_zero() => Some(delta),
        _ => None,
    }
}

/// Decodes a body as a JSON object, returning `None` for anything else.
pub(crate) fn decode_object(body: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Decodes a successful response body. An empty body is an empty object; a
/// non-empty body that is not a JSON object is a protocol violation.
pub(crate) fn decode_success(response: &TransportResponse) -> Result<Map<String, Value>> {
    if response.body.is_empty() {
        return Ok(Map::new());
    }

    decode_object(&response.body).ok_or_else(|| {
        tracing::error!(
            status = response.status.as_u16(),
            raw_response = %response.body,
            "Response body is not a JSON object"
        );
        Error::Protocol {
            message: "Unexpected response payload (not JSON)".to_string(),
            status: response.status,
            body: None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderValue, StatusCode};

    fn response(status: u16, body: &str) -> TransportResponse {
        TransportResponse::new(StatusCode::from_u16(status).unwrap(), HeaderMap::new(), body)
    }

    fn api_error(result: Result<TransportResponse>) -> ApiError {
        match result {
            Err(Error::Api(e)) => e,
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_success_passes_through() {
        let ok = classify(response(201, r#"{"id":"x"}"#)).unwrap();
        assert_eq!(ok.status, StatusCode::CREATED);
        assert_eq!(ok.body, r#"{"id":"x"}"#);
    }

    #[test]
    fn test_message_field_precedence() {
        let e = api_error(classify(response(
            400,
            r#"{"detail":"third","error":"second","message":"first"}"#,
        )));
        assert_eq!(e.kind, ErrorKind::BadRequest);
        assert_eq!(e.message, "first");

        let e = api_error(classify(response(422, r#"{"detail":"third","error":"second"}"#)));
        assert_eq!(e.kind, ErrorKind::Unprocessable);
        assert_eq!(e.message, "second");

        let e = api_error(classify(response(403, r#"{"detail":"third"}"#)));
        assert_eq!(e.message, "third");
    }

    #[test]
    fn test_non_string_message_is_skipped() {
        let e = api_error(classify(response(401, r#"{"message":42,"error":"denied"}"#)));
        assert_eq!(e.kind, ErrorKind::Unauthorized);
        assert_eq!(e.message, "denied");
    }

    #[test]
    fn test_undecodable_body_uses_fallback() {
        let e = api_error(classify(response(502, "<html>Bad gateway</html>")));
        assert_eq!(e.kind, ErrorKind::ServerError);
        assert_eq!(e.status, StatusCode::BAD_GATEWAY);
        assert_eq!(e.message, FALLBACK_MESSAGE);
        assert!(e.body.is_none());
    }

    #[test]
    fn test_body_is_preserved() {
        let e = api_error(classify(response(404, r#"{"message":"Missing","code":"nf"}"#)));
        let body = e.body.unwrap();
        assert_eq!(body.get("code").and_then(Value::as_str), Some("nf"));
    }

    #[test]
    fn test_retry_after_only_for_429() {
        let mut headers = HeaderMap::new();
        headers.insert("retry-after", HeaderValue::from_static("7"));

        let throttled = TransportResponse::new(StatusCode::TOO_MANY_REQUESTS, headers.clone(), "");
        let e = api_error(classify(throttled));
        assert_eq!(e.kind, ErrorKind::TooManyRequests);
        assert_eq!(e.retry_after, Some(Duration::from_secs(7)));

        let unavailable = TransportResponse::new(StatusCode::SERVICE_UNAVAILABLE, headers, "");
        let e = api_error(classify(unavailable));
        assert_eq!(e.retry_after, None);
    }

    #[test]
    fn test_parse_retry_after_seconds() {
        let mut headers = HeaderMap::new();
        headers.insert("retry-after", HeaderValue::from_static("120"));
        assert_eq!(parse_retry_after(&headers), Some(Duration::from_secs(120)));
    }

    #[test]
    fn test_parse_retry_after_http_date() {
        let future = SystemTime::now() + Duration::from_secs(10);
        let mut headers = HeaderMap::new();
        headers.insert(
            "retry-after",
            HeaderValue::from_str(&httpdate::fmt_http_date(future)).unwrap(),
        );

        let delay = parse_retry_after(&headers).unwrap();
        assert!(
            delay >= Duration::from_secs(9) && delay <= Duration::from_secs(11),
            "Delay should be about 10 seconds, got {:?}",
            delay
        );
    }

    #[test]
    fn test_parse_retry_after_past_date() {
        let past = SystemTime::now() - Duration::from_secs(60);
        let mut headers = HeaderMap::new();
        headers.insert(
            "retry-after",
            HeaderValue::from_str(&httpdate::fmt_http_date(past)).unwrap(),
        );
        assert_eq!(parse_retry_after(&headers), None);
    }

    #[test]
    fn test_parse_retry_after_garbage() {
        let mut headers = HeaderMap::new();
        headers.insert("retry-after", HeaderValue::from_static("soon-ish"));
        assert_eq!(parse_retry_after(&headers), None);

        headers.insert("retry-after", HeaderValue::from_static("-5"));
        assert_eq!(parse_retry_after(&headers), None);

        assert_eq!(parse_retry_after(&HeaderMap::new()), None);
    }

    #[test]
    fn test_decode_success() {
        assert!(decode_success(&response(200, "")).unwrap().is_empty());
        assert!(matches!(
            decode_success(&response(200, "[1,2]")),
            Err(Error::Protocol { .. })
        ));
    }
}
