//! Retry policies with exponential backoff
//!
//! Retries transient failures of platform API calls: transport errors,
//! timeouts, 429 and 5xx responses. Anything else is returned on the first
//! attempt so callers can classify it.

use super::metrics::MetricsCollector;
use log::{debug, warn};
use rand::Rng;
use std::future::Future;
use std::time::Duration;

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Single attempt, no waiting
    pub fn disabled() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
            jitter: false,
        }
    }
}

/// Types of errors and their retry behavior
#[derive(Debug, Clone, PartialEq)]
pub enum RetryableError {
    /// Network-level errors (connection refused, DNS, reset)
    Network,
    /// HTTP 5xx server errors
    ServerError(u16),
    /// HTTP 429 Too Many Requests
    RateLimited,
    /// HTTP 408 or a client-side timeout
    Timeout,
    /// Non-retryable client errors (4xx except 408, 429)
    ClientError(u16),
    /// Unknown/other errors
    Unknown,
}

impl RetryableError {
    pub fn should_retry(&self) -> bool {
        match self {
            RetryableError::Network => true,
            RetryableError::ServerError(_) => true,
            RetryableError::RateLimited => true,
            RetryableError::Timeout => true,
            RetryableError::ClientError(_) => false,
            RetryableError::Unknown => false,
        }
    }

    pub fn from_status_code(status: u16) -> Self {
        match status {
            408 => RetryableError::Timeout,
            429 => RetryableError::RateLimited,
            400..=499 => RetryableError::ClientError(status),
            500..=599 => RetryableError::ServerError(status),
            _ => RetryableError::Unknown,
        }
    }

    pub fn from_reqwest_error(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            RetryableError::Timeout
        } else if error.is_connect() || error.is_request() {
            RetryableError::Network
        } else if let Some(status) = error.status() {
            Self::from_status_code(status.as_u16())
        } else {
            RetryableError::Unknown
        }
    }
}

/// Retry policy that implements exponential backoff with jitter
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
    metrics: Option<MetricsCollector>,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            metrics: None,
        }
    }

    /// Count every retry in the given collector
    pub fn with_metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Send a request, retrying transient failures.
    ///
    /// A response with a retryable status is retried too; once attempts run
    /// out the last response is returned as-is.
    pub async fn execute<F, Fut>(
        &self,
        label: &str,
        operation: F,
    ) -> Result<reqwest::Response, reqwest::Error>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
    {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let kind = match operation().await {
                Ok(response) => {
                    let status = response.status();
                    let kind = RetryableError::from_status_code(status.as_u16());
                    if status.is_success() || !kind.should_retry() || attempt == max_attempts {
                        return Ok(response);
                    }
                    warn!(
                        "{} returned {} on attempt {}/{}, retrying",
                        label, status, attempt, max_attempts
                    );
                    kind
                }
                Err(error) => {
                    let kind = RetryableError::from_reqwest_error(&error);
                    if !kind.should_retry() || attempt == max_attempts {
                        warn!(
                            "{} failed permanently on attempt {} ({:?}): {}",
                            label, attempt, kind, error
                        );
                        return Err(error);
                    }
                    warn!(
                        "{} failed on attempt {}/{} ({:?}), retrying: {}",
                        label, attempt, max_attempts, kind, error
                    );
                    kind
                }
            };

            if let Some(metrics) = &self.metrics {
                metrics.record_retry();
            }

            let delay = self.calculate_delay(attempt);
            debug!("{}: waiting {:?} before retry ({:?})", label, delay, kind);
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Calculate exponential backoff delay with optional jitter
    fn calculate_delay(&self, attempt: u32) -> Duration {
        let delay_ms = (self.config.base_delay.as_millis() as f64)
            * self.config.backoff_multiplier.powi(attempt as i32 - 1);

        let mut delay = Duration::from_millis(delay_ms as u64);

        if delay > self.config.max_delay {
            delay = self.config.max_delay;
        }

        if self.config.jitter && !delay.is_zero() {
            let jitter_factor = rand::thread_rng().gen_range(0.5..=1.5);
            let jittered_ms = (delay.as_millis() as f64 * jitter_factor) as u64;
            delay = Duration::from_millis(jittered_ms);
        }

        delay
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}
