//! Client configuration and the headers and URLs derived from it.

use crate::{Backoff, Error, Result};
use http::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use http::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;
use url::Url;

/// Production API host.
pub const DEFAULT_BASE_URL: &str = "https://public-api.gamma.app";

/// API version path segment.
pub const DEFAULT_API_VERSION: &str = "v0.2";

/// Overall per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection establishment timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Retries after the first attempt of a status check.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Default `User-Agent`.
pub const DEFAULT_USER_AGENT: &str = concat!("gamma-sdk-rust/", env!("CARGO_PKG_VERSION"));

/// Environment variable read by [`ClientConfig::from_env`].
pub const API_KEY_ENV: &str = "GAMMA_API_KEY";

const API_KEY_HEADER: &str = "x-api-key";
const JSON: &str = "application/json";

/// Everything a [`GammaClient`](crate::GammaClient) needs to know about the API
/// it talks to.
///
/// # Examples
///
/// ```
/// use gamma_sdk::{Backoff, ClientConfig};
/// use std::time::Duration;
///
/// # fn main() -> Result<(), gamma_sdk::Error> {
/// let config = ClientConfig::new()
///     .with_api_key("sk-gamma-xxx")
///     .with_timeout(Duration::from_secs(60))
///     .with_max_retries(4)
///     .with_backoff(Backoff::Fixed(Duration::from_secs(1)))
///     .with_default_header("X-Team", "docs")?;
///
/// assert!(config.has_api_key());
/// assert_eq!(
///     config.endpoint(&["generations"])?.as_str(),
///     "https://public-api.gamma.app/v0.2/generations"
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: String,
    api_version: String,
    api_key: Option<String>,
    timeout: Duration,
    connect_timeout: Duration,
    max_retries: u32,
    backoff: Backoff,
    default_headers: HeaderMap,
    user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: Backoff::default(),
            default_headers: HeaderMap::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Creates a configuration with all defaults and no API key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a default configuration with the API key from `GAMMA_API_KEY`.
    pub fn from_env() -> Self {
        Self::from_env_with_key(None)
    }

    /// Like [`from_env`](Self::from_env), but an explicit key wins over the environment.
    pub fn from_env_with_key(api_key: Option<&str>) -> Self {
        let api_key = api_key
            .map(str::to_string)
            .or_else(|| std::env::var(API_KEY_ENV).ok());

        match api_key {
            Some(key) => Self::default().with_api_key(key),
            None => Self::default(),
        }
    }

    /// Sets the base URL. Trailing slashes are dropped.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Self {
        self.base_url = base_url.as_ref().trim_end_matches('/').to_string();
        self
    }

    /// Sets the API version segment. Surrounding slashes are dropped.
    pub fn with_api_version(mut self, api_version: impl AsRef<str>) -> Self {
        self.api_version = api_version.as_ref().trim_matches('/').to_string();
        self
    }

    /// Sets the API key. A blank key counts as no key.
    pub fn with_api_key(mut self, api_key: impl AsRef<str>) -> Self {
        let key = api_key.as_ref().trim();
        self.api_key = (!key.is_empty()).then(|| key.to_string());
        self
    }

    /// Sets the overall request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the connection establishment timeout.
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Sets how many times a failed status check is retried.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Replaces the backoff policy used between retries.
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Adds a header sent with every request.
    ///
    /// Setting `Accept`, `Content-Type` or `User-Agent` here overrides the SDK's value.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn with_default_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::Configuration(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::Configuration(format!("Invalid header value: {}", e)))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Sets the `User-Agent` sent when no default header overrides it.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Returns `true` if an API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn backoff(&self) -> &Backoff {
        &self.backoff
    }

    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Builds the headers for a request.
    ///
    /// Default headers come first. `Accept` and `Content-Type` (both
    /// `application/json`) and `User-Agent` are only added when missing.
    /// `X-API-KEY` is set when a key is configured, and `extra` goes on top.
    ///
    /// # Errors
    ///
    /// Returns an error if the user agent or API key is not a valid header value.
    pub fn build_headers(&self, extra: &HeaderMap) -> Result<HeaderMap> {
        let mut headers = self.default_headers.clone();
        headers
            .entry(ACCEPT)
            .or_insert_with(|| HeaderValue::from_static(JSON));
        headers
            .entry(CONTENT_TYPE)
            .or_insert_with(|| HeaderValue::from_static(JSON));

        if !headers.contains_key(USER_AGENT) {
            let user_agent = HeaderValue::try_from(self.user_agent.as_str())
                .map_err(|e| Error::Configuration(format!("Invalid user agent: {}", e)))?;
            headers.insert(USER_AGENT, user_agent);
        }

        if let Some(api_key) = &self.api_key {
            let mut value = HeaderValue::try_from(api_key.as_str())
                .map_err(|e| Error::Configuration(format!("Invalid API key: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(HeaderName::from_static(API_KEY_HEADER), value);
        }

        for (name, value) in extra {
            headers.insert(name.clone(), value.clone());
        }

        Ok(headers)
    }

    /// Joins `{base_url}/{api_version}/` with the given path segments.
    ///
    /// Segments are percent-encoded as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or cannot carry a path.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?;
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                Error::Configuration(format!("Base URL cannot carry a path: {}", self.base_url))
            })?;
            path.pop_if_empty();
            path.extend(self.api_version.split('/').filter(|s| !s.is_empty()));
            path.extend(segments);
        }
        Ok(url)
    }
}
