pub mod members;
pub mod report;
pub mod watch;

pub use members::{MembersCommands, handle_members_command};
pub use report::{ReportCommands, handle_report_command};
pub use watch::{WatchCommands, handle_watch_command};

use anyhow::Result;
use colored::*;
use queue_utilization::api::MetricsSnapshot;
use queue_utilization::{Config, Pipeline};

/// Validate the configuration and build a pipeline from it
pub fn build_pipeline(config: &Config) -> Result<Pipeline> {
    Pipeline::new(config.pipeline_config()?)
}

/// One-line summary of the last run, for the bottom of a table
pub fn metrics_line(metrics: &MetricsSnapshot) -> String {
    let duration = metrics
        .last_run
        .as_ref()
        .map(|run| format!("{:.2}s", run.duration.as_secs_f64()))
        .unwrap_or_else(|| "-".to_string());

    format!(
        "runs: {}  failed runs: {}  fetch errors: {} ({:.0}%)  retries: {}  last run: {}",
        metrics.runs,
        metrics.failed_runs,
        metrics.utilization_failed,
        metrics.utilization_error_rate() * 100.0,
        metrics.retries,
        duration
    )
    .dimmed()
    .to_string()
}
