//! Resilience features for platform API calls
//!
//! Retry with backoff, request timeouts, and counters for the failures
//! the pipeline absorbs.

pub mod config;
pub mod metrics;
pub mod retry;

pub use config::{ResilienceConfig, ResilienceConfigBuilder, TimeoutConfig};
pub use metrics::{MetricsCollector, MetricsSnapshot, RunMetrics};
pub use retry::{RetryConfig, RetryPolicy, RetryableError};
