//! Resilience configuration with builder pattern
//!
//! Groups retry and timeout settings for platform API calls.

use super::retry::RetryConfig;
use std::time::Duration;

/// Resilience configuration for API calls
#[derive(Debug, Clone)]
pub struct ResilienceConfig {
    pub retry: RetryConfig,
    pub timeouts: TimeoutConfig,
}

/// Per-request time limits
#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    pub request: Duration,
    pub connect: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request: Duration::from_secs(30),
            connect: Duration::from_secs(10),
        }
    }
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            retry: RetryConfig::default(),
            timeouts: TimeoutConfig::default(),
        }
    }
}

impl ResilienceConfig {
    pub fn builder() -> ResilienceConfigBuilder {
        ResilienceConfigBuilder::new()
    }

    /// No retries, default timeouts
    pub fn disabled() -> Self {
        Self {
            retry: RetryConfig::disabled(),
            timeouts: TimeoutConfig::default(),
        }
    }
}

/// Builder for ResilienceConfig
#[derive(Debug)]
pub struct ResilienceConfigBuilder {
    config: ResilienceConfig,
}

impl ResilienceConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ResilienceConfig::default(),
        }
    }

    pub fn retry_config(mut self, retry: RetryConfig) -> Self {
        self.config.retry = retry;
        self
    }

    pub fn max_retries(mut self, attempts: u32) -> Self {
        self.config.retry.max_attempts = attempts;
        self
    }

    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.config.retry.base_delay = delay;
        self
    }

    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.config.retry.max_delay = delay;
        self
    }

    pub fn jitter(mut self, enabled: bool) -> Self {
        self.config.retry.jitter = enabled;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeouts.request = timeout;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeouts.connect = timeout;
        self
    }

    pub fn build(self) -> ResilienceConfig {
        self.config
    }
}

impl Default for ResilienceConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ResilienceConfig::default();

        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.timeouts.request, Duration::from_secs(30));
        assert_eq!(config.timeouts.connect, Duration::from_secs(10));
    }

    #[test]
    fn test_disabled_config() {
        let config = ResilienceConfig::disabled();
        assert_eq!(config.retry.max_attempts, 1);
        assert!(!config.retry.jitter);
    }

    #[test]
    fn test_builder_pattern() {
        let config = ResilienceConfig::builder()
            .max_retries(5)
            .base_delay(Duration::from_millis(10))
            .jitter(false)
            .request_timeout(Duration::from_secs(5))
            .build();

        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.base_delay, Duration::from_millis(10));
        assert!(!config.retry.jitter);
        assert_eq!(config.timeouts.request, Duration::from_secs(5));
        assert_eq!(config.timeouts.connect, Duration::from_secs(10));
    }
}
