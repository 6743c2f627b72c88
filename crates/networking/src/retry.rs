//! Retry logic with exponential backoff
//!
//! Retrying is opt-in. The default [`RetryConfig`] performs no retries, which
//! keeps a wrapped client at exactly one attempt per request.

use crate::client::{HttpGet, HttpResponse};
use crate::{is_recoverable_status, NetworkError, Result};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: usize,
    /// Initial delay between retries
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Backoff multiplier (e.g., 2.0 for exponential backoff)
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Create a new retry configuration
    pub fn new(max_retries: usize) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// Set the initial delay
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the maximum delay
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set the backoff multiplier
    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Calculate the delay for a given retry attempt
    pub fn delay_for(&self, attempt: usize) -> Duration {
        let delay_ms =
            self.initial_delay.as_millis() as f64 * self.backoff_multiplier.powi(attempt as i32);

        Duration::from_millis(delay_ms as u64).min(self.max_delay)
    }
}

/// Retry an async operation with a configurable retry policy
///
/// `should_retry` decides per error whether another attempt is made. Once
/// `max_retries` extra attempts have failed the last error is returned.
pub async fn retry<F, Fut, T, E>(
    config: &RetryConfig,
    should_retry: impl Fn(&E) -> bool,
    mut operation: F,
) -> std::result::Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
{
    let mut attempts = 0;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(err) => {
                if !should_retry(&err) || attempts >= config.max_retries {
                    return Err(err);
                }

                sleep(config.delay_for(attempts)).await;
                attempts += 1;
            }
        }
    }
}

/// An [`HttpGet`] wrapper that retries recoverable failures
///
/// Transport errors, timeouts, and transient statuses (429, 503, ...) are
/// retried. A transient status that survives every attempt surfaces as
/// [`NetworkError::Status`].
#[derive(Debug, Clone)]
pub struct RetryingClient<C> {
    inner: C,
    config: RetryConfig,
}

impl<C: HttpGet> RetryingClient<C> {
    /// Wrap a client
    pub fn new(inner: C, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    /// Get the retry configuration
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }
}

#[async_trait]
impl<C: HttpGet> HttpGet for RetryingClient<C> {
    async fn get(&self, endpoint: &str, params: &[(String, String)]) -> Result<HttpResponse> {
        let inner = &self.inner;
        retry(&self.config, NetworkError::is_recoverable, move || async move {
            let response = inner.get(endpoint, params).await?;
            if is_recoverable_status(response.status) {
                warn!(endpoint, status = response.status, "transient status");
                return Err(NetworkError::Status(response.status));
            }
            Ok::<_, NetworkError>(response)
        })
        .await
    }
}
