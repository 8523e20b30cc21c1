//! The Gamma generation client.
//!
//! [`GammaClient`] creates generations and checks their status. Use
//! [`ClientBuilder`] to configure one; clones share the same transport and
//! configuration.

use crate::{
    classify::{classify, decode_success},
    polling::Poller,
    response::{extract_warnings, parse_created, parse_status},
    retry::retry_delay,
    sleep::{Sleeper, TokioSleeper},
    transport::{ReqwestTransport, Transport, TransportRequest, TransportResponse},
    ClientConfig, CreateGenerationResult, GenerationRequest, GenerationStatus, Result,
};
use http::{HeaderMap, Method};
use std::sync::Arc;
use tokio::time::Instant;

/// A client for the Gamma generation API.
///
/// Holds only immutable configuration and shared collaborators, so one client
/// can serve many concurrent calls.
///
/// # Examples
///
/// ```no_run
/// use gamma_sdk::{ClientConfig, Format, GammaClient, GenerationRequest, TextMode};
///
/// # async fn example() -> Result<(), gamma_sdk::Error> {
/// let client = GammaClient::builder()
///     .config(ClientConfig::new().with_api_key("sk-gamma-xxx"))
///     .build()?;
///
/// let request = GenerationRequest::new()
///     .input_text("Quarterly results")?
///     .format(Format::Presentation)
///     .text_mode(TextMode::Generate);
///
/// let created = client.create_generation(request).await?;
/// let done = client.poller().wait_with_defaults(&created.generation_id).await?;
/// println!("Ready: {}", done.gamma_url);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct GammaClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: ClientConfig,
    headers: HeaderMap,
    transport: Arc<dyn Transport>,
    sleeper: Arc<dyn Sleeper>,
}

impl GammaClient {
    /// Creates a new `ClientBuilder`.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Creates a client with the given configuration and the default transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: ClientConfig) -> Result<Self> {
        ClientBuilder::new().config(config).build()
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Creates a [`Poller`] that waits on generations through this client.
    pub fn poller(&self) -> Poller {
        Poller::new(self.clone())
    }

    pub(crate) fn sleeper(&self) -> Arc<dyn Sleeper> {
        Arc::clone(&self.inner.sleeper)
    }

    /// Starts a new generation.
    ///
    /// Sent exactly once: a failed create is never retried, so a timeout or
    /// 5xx cannot produce duplicate generations.
    ///
    /// # Errors
    ///
    /// * [`Error::Validation`](crate::Error::Validation) if the request is incomplete
    /// * [`Error::Api`](crate::Error::Api) for any non-2xx response
    /// * [`Error::Protocol`](crate::Error::Protocol) if the response has no generation id
    pub async fn create_generation(
        &self,
        request: GenerationRequest,
    ) -> Result<CreateGenerationResult> {
        let payload = request.build()?;
        let url = self.inner.config.endpoint(&["generations"])?;
        let request = TransportRequest::new(Method::POST, url)
            .with_headers(self.inner.headers.clone())
            .with_body(payload.to_json()?);

        let response = self.dispatch(request, 1).await?;
        let mut data = decode_success(&response)?;
        let warnings = extract_warnings(&mut data, "POST /generations");
        let created = parse_created(data, warnings, response.status)?;

        tracing::info!(
            generation_id = %created.generation_id,
            warnings = created.warnings.len(),
            "Generation created"
        );

        Ok(created)
    }

    /// Checks the status of a generation.
    ///
    /// Transport failures, 429 and 5xx responses are retried up to the
    /// configured `max_retries`; when the budget runs out the last error is
    /// returned as-is.
    ///
    /// # Errors
    ///
    /// * [`Error::Api`](crate::Error::Api) for non-2xx responses
    /// * [`Error::Transport`](crate::Error::Transport) if no response arrived
    /// * [`Error::Protocol`](crate::Error::Protocol) for unknown status strings or a
    ///   completed generation without a URL
    pub async fn get_generation(&self, generation_id: &str) -> Result<GenerationStatus> {
        let url = self
            .inner
            .config
            .endpoint(&["generations", generation_id])?;
        let request =
            TransportRequest::new(Method::GET, url).with_headers(self.inner.headers.clone());

        let response = self.send_with_retry(request).await?;
        let mut data = decode_success(&response)?;
        let warnings = extract_warnings(&mut data, "GET /generations");

        parse_status(data, warnings, generation_id, response.status)
    }

    /// Sends a request, retrying transient failures per the configured policy.
    async fn send_with_retry(&self, request: TransportRequest) -> Result<TransportResponse> {
        let config = &self.inner.config;
        let mut attempt = 0;

        loop {
            attempt += 1;

            let error = match self.dispatch(request.clone(), attempt).await {
                Ok(response) => return Ok(response),
                Err(e) => e,
            };

            let Some(delay) = retry_delay(&error, attempt, config.max_retries(), config.backoff())
            else {
                if error.is_retryable() {
                    tracing::warn!(
                        error = %error,
                        attempts = attempt,
                        "Retry budget exhausted"
                    );
                }
                return Err(error);
            };

            tracing::warn!(
                error = %error,
                attempt = attempt,
                delay_ms = delay.as_millis(),
                method = %request.method,
                url = %request.url,
                "Request failed, retrying after delay"
            );

            self.inner.sleeper.sleep(delay).await;
        }
    }

    /// Executes a single attempt and classifies the response.
    async fn dispatch(&self, request: TransportRequest, attempt: u32) -> Result<TransportResponse> {
        tracing::debug!(
            method = %request.method,
            url = %request.url,
            attempt = attempt,
            "Executing HTTP request"
        );

        let start_time = Instant::now();
        let response = self.inner.transport.send(request).await?;

        tracing::info!(
            status = response.status.as_u16(),
            latency_ms = start_time.elapsed().as_millis(),
            attempt = attempt,
            "Received HTTP response"
        );

        classify(response)
    }
}

/// Builder for configuring and creating a [`GammaClient`].
///
/// # Examples
///
/// ```no_run
/// use gamma_sdk::{sleep::NoopSleeper, Backoff, ClientBuilder, ClientConfig};
/// use std::time::Duration;
///
/// # fn example() -> Result<(), gamma_sdk::Error> {
/// let client = ClientBuilder::new()
///     .config(
///         ClientConfig::from_env()
///             .with_max_retries(5)
///             .with_backoff(Backoff::Fixed(Duration::from_millis(200))),
///     )
///     .sleeper(NoopSleeper)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    sleeper: Option<Arc<dyn Sleeper>>,
}

impl ClientBuilder {
    /// Creates a builder starting from [`ClientConfig::from_env`].
    pub fn new() -> Self {
        Self {
            config: ClientConfig::from_env(),
            transport: None,
            sleeper: None,
        }
    }

    /// Replaces the configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Uses a custom transport instead of the default `reqwest` one.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Uses a custom sleeper for retry delays and polling.
    pub fn sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Some(Arc::new(sleeper));
        self
    }

    /// Builds the configured `GammaClient`.
    ///
    /// A missing API key is logged as a warning, not rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL or a header value is invalid, or if
    /// the default transport cannot be built.
    pub fn build(self) -> Result<GammaClient> {
        let config = self.config;
        config.endpoint(&[])?;
        let headers = config.build_headers(&HeaderMap::new())?;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(
                config.timeout(),
                config.connect_timeout(),
            )?),
        };
        let sleeper = self.sleeper.unwrap_or_else(|| Arc::new(TokioSleeper));

        if !config.has_api_key() {
            tracing::warn!(
                "Gamma client initialized without an API key. Requests will likely fail with 401."
            );
        }

        Ok(GammaClient {
            inner: Arc::new(ClientInner {
                config,
                headers,
                transport,
                sleeper,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
