//! Genesys Cloud routing API
//!
//! Token handling, paged queue membership, and per-user utilization, all
//! sharing one pooled HTTP client with retries and timeouts.

pub mod auth;
pub mod client;
pub mod constants;
pub mod members;
pub mod models;
pub mod resilience;
pub mod utilization;

pub use auth::{Clock, ManualClock, SystemClock, TokenCache};
pub use client::RoutingClient;
pub use constants::Endpoints;
pub use members::MemberLister;
pub use models::{ChannelUtilization, Member, TokenInfo, UtilizationRecord};
pub use resilience::{
    MetricsCollector, MetricsSnapshot, ResilienceConfig, RetryConfig, RetryPolicy, RetryableError,
    RunMetrics, TimeoutConfig,
};
pub use utilization::{FetchOutcome, UtilizationFetcher};
