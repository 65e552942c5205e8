use std::time::Duration;

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tochka_domain::constants::{DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_MAX_ATTEMPTS};
use tochka_domain::TochkaError;
use tracing::{debug, warn};

use crate::errors::InfraError;

/// When and how often a request is sent again
///
/// Only idempotent methods get more than one attempt. The delay before retry
/// `n` is `base_backoff * 2^(n-1)`, capped at `max_backoff`; a `Retry-After`
/// header in seconds overrides it within the same cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Attempts allowed for a request with `method`.
    pub fn attempts_for(&self, method: &Method) -> usize {
        if is_idempotent(method) {
            self.max_attempts.max(1)
        } else {
            1
        }
    }

    /// Delay before retry number `retry` (1-based).
    pub fn delay(&self, retry: usize) -> Duration {
        let shift = u32::try_from(retry.saturating_sub(1).min(16)).unwrap_or(16);
        self.base_backoff.saturating_mul(1 << shift).min(self.max_backoff)
    }

    fn delay_after(&self, retry: usize, headers: &HeaderMap) -> Duration {
        retry_after(headers).map_or_else(|| self.delay(retry), |wait| wait.min(self.max_backoff))
    }
}

/// HTTP transport shared by the OAuth client and the API client
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    retry: RetryPolicy,
}

impl HttpClient {
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Client with the default timeout and retry policy.
    pub fn new() -> Result<Self, TochkaError> {
        Self::builder().build()
    }

    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Send `builder`, retrying idempotent requests on 5xx responses and on
    /// connect or timeout failures
    ///
    /// The last response is returned as-is whatever its status; mapping
    /// statuses to errors is up to the caller.
    ///
    /// # Errors
    /// `TochkaError::Network` when no response was received at all.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, TochkaError> {
        let mut retry = 0;

        loop {
            let request = builder
                .try_clone()
                .ok_or_else(|| TochkaError::Internal("streaming request bodies cannot be sent".into()))?
                .build()
                .map_err(|err| TochkaError::from(InfraError::from(err)))?;
            let attempts = self.retry.attempts_for(request.method());
            let attempt = retry + 1;
            let method = request.method().clone();
            let url = request.url().clone();

            debug!(attempt, attempts, %method, %url, "Sending HTTP request");
            let delay = match self.client.execute(request).await {
                Ok(response) if response.status().is_server_error() && attempt < attempts => {
                    let status = response.status();
                    let delay = self.retry.delay_after(attempt, response.headers());
                    warn!(attempt, %method, %url, %status, ?delay, "Server error, retrying");
                    delay
                }
                Ok(response) => {
                    debug!(attempt, %method, %url, status = %response.status(), "HTTP response");
                    return Ok(response);
                }
                Err(err) if attempt < attempts && is_transient(&err) => {
                    let delay = self.retry.delay(attempt);
                    warn!(attempt, %method, %url, error = %err, ?delay, "Transport error, retrying");
                    delay
                }
                Err(err) => {
                    debug!(attempt, %method, %url, error = %err, "HTTP request failed");
                    return Err(InfraError::from(err).into());
                }
            };

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            retry += 1;
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    retry: RetryPolicy,
    user_agent: Option<String>,
    default_headers: Option<HeaderMap>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
            user_agent: None,
            default_headers: None,
        }
    }
}

impl HttpClientBuilder {
    /// Timeout of a single attempt.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total attempts for idempotent requests, the first one included.
    #[must_use]
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.retry.max_attempts = attempts.max(1);
        self
    }

    #[must_use]
    pub const fn base_backoff(mut self, backoff: Duration) -> Self {
        self.retry.base_backoff = backoff;
        self
    }

    #[must_use]
    pub const fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    #[must_use]
    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    pub fn build(self) -> Result<HttpClient, TochkaError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();
        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }
        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(|err| TochkaError::from(InfraError::from(err)))?;
        Ok(HttpClient { client, retry: self.retry })
    }
}

fn is_idempotent(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::PUT | Method::DELETE)
}

fn is_transient(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}

/// `Retry-After` in delta-seconds; HTTP dates are ignored.
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}
