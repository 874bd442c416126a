//! Per-agent channel utilization reports for a Genesys Cloud routing queue.
//!
//! [`Pipeline`] authenticates with a cached client-credentials token, lists
//! the queue's members page by page, fetches each member's utilization, and
//! aggregates everything into an agents × channel types [`AggregatedReport`].

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;

pub use config::Config;
pub use error::{AuthError, MembershipError, PipelineError, UtilizationFetchError};
pub use pipeline::{Pipeline, PipelineConfig};
pub use report::{AggregatedReport, ReportData};
