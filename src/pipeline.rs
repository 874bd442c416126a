//! One report-generation cycle: token, roster, per-agent utilization, aggregation

use crate::api::{
    Clock, Endpoints, MemberLister, MetricsCollector, MetricsSnapshot, ResilienceConfig,
    RoutingClient, RunMetrics, TokenCache, UtilizationFetcher,
};
use crate::auth::Credentials;
use crate::error::PipelineError;
use crate::report::{AgentRow, AggregatedReport, Aggregator, ReportData};
use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use log::{error, info};
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;

/// Everything a pipeline needs, fixed for its lifetime
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub credentials: Credentials,
    pub endpoints: Endpoints,
    pub queue_id: String,
    pub page_size: u32,
    /// Utilization fetches in flight at once; 1 fetches sequentially
    pub concurrency: usize,
    pub excluded_channels: Vec<String>,
    pub resilience: ResilienceConfig,
}

#[derive(Debug)]
pub struct Pipeline {
    queue_id: String,
    concurrency: usize,
    tokens: TokenCache,
    lister: MemberLister,
    fetcher: UtilizationFetcher,
    aggregator: Aggregator,
    metrics: MetricsCollector,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let metrics = MetricsCollector::new();
        let client = RoutingClient::new(config.endpoints.clone(), &config.resilience, metrics.clone())
            .context("Failed to build HTTP client")?;

        Ok(Self {
            tokens: TokenCache::new(client.clone(), config.credentials),
            lister: MemberLister::new(client.clone(), config.queue_id.clone(), config.page_size),
            fetcher: UtilizationFetcher::new(client, config.queue_id.clone()),
            aggregator: Aggregator::new(config.excluded_channels),
            queue_id: config.queue_id,
            concurrency: config.concurrency.max(1),
            metrics,
        })
    }

    /// Use a different clock for token expiry
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.tokens = self.tokens.with_clock(clock);
        self
    }

    pub fn queue_id(&self) -> &str {
        &self.queue_id
    }

    pub fn token_cache(&self) -> &TokenCache {
        &self.tokens
    }

    pub fn member_lister(&self) -> &MemberLister {
        &self.lister
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Produce a complete report, or fail if no token or roster could be had
    pub async fn run(&self) -> Result<AggregatedReport, PipelineError> {
        let run_id = uuid::Uuid::new_v4().to_string();
        let started = Instant::now();
        info!("[{}] Starting utilization run for queue {}", run_id, self.queue_id);

        let result = self.run_cycle(&run_id).await;
        let duration = started.elapsed();

        let run = match &result {
            Ok(report) => {
                info!(
                    "[{}] Report ready in {:?}: {} agents, {} channels, {} unavailable",
                    run_id,
                    duration,
                    report.rows().len(),
                    report.columns().len(),
                    report.failed_count()
                );
                RunMetrics {
                    run_id,
                    succeeded: true,
                    duration,
                    members: report.rows().len(),
                    failed_fetches: report.failed_count(),
                }
            }
            Err(err) => {
                error!("[{}] Run aborted after {:?}: {}", run_id, duration, err);
                RunMetrics {
                    run_id,
                    succeeded: false,
                    duration,
                    members: 0,
                    failed_fetches: 0,
                }
            }
        };
        self.metrics.record_run(run);

        result
    }

    async fn run_cycle(&self, run_id: &str) -> Result<AggregatedReport, PipelineError> {
        let token = self.tokens.get_token().await?;
        let members = self.lister.list_members(&token).await?;
        info!(
            "[{}] Fetching utilization for {} members ({} at a time)",
            run_id,
            members.len(),
            self.concurrency
        );

        let fetcher = &self.fetcher;
        let token = token.as_str();

        // `buffered` yields in input order, so rows keep the listing order
        let rows: Vec<AgentRow> = stream::iter(members)
            .map(move |member| async move {
                let outcome = fetcher.fetch_utilization(token, &member).await;
                AgentRow::from((member, outcome))
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        Ok(self.aggregator.aggregate(rows))
    }

    /// Run once and convert the report into its serializable form
    pub async fn snapshot(&self) -> Result<ReportData, PipelineError> {
        let report = self.run().await?;
        Ok(ReportData::from_report(&self.queue_id, &report))
    }

    /// Take a snapshot every `interval`, starting immediately, until `on_cycle` breaks.
    ///
    /// Failed cycles are handed over like successful ones and do not stop
    /// the loop by themselves.
    pub async fn watch<F>(&self, interval: Duration, mut on_cycle: F)
    where
        F: FnMut(Result<ReportData, PipelineError>) -> ControlFlow<()>,
    {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if on_cycle(self.snapshot().await).is_break() {
                break;
            }
        }
    }
}
