//! Counters for pipeline runs and the API calls behind them
//!
//! Per-agent utilization failures never fail a run, so this collector is
//! where they become visible.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Shared metrics collector, cheap to clone
#[derive(Debug, Clone)]
pub struct MetricsCollector {
    inner: Arc<Mutex<MetricsCollectorInner>>,
}

#[derive(Debug)]
struct MetricsCollectorInner {
    counters: Counters,
    last_run: Option<RunMetrics>,
    start_time: Instant,
}

#[derive(Debug, Clone, Default)]
struct Counters {
    runs: u64,
    failed_runs: u64,
    token_exchanges: u64,
    member_pages: u64,
    utilization_fetched: u64,
    utilization_failed: u64,
    retries: u64,
}

/// Outcome of the most recent pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetrics {
    pub run_id: String,
    pub succeeded: bool,
    pub duration: Duration,
    pub members: usize,
    pub failed_fetches: usize,
}

/// Point-in-time copy of all counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub runs: u64,
    pub failed_runs: u64,
    pub token_exchanges: u64,
    pub member_pages: u64,
    pub utilization_fetched: u64,
    pub utilization_failed: u64,
    pub retries: u64,
    pub last_run: Option<RunMetrics>,
    pub uptime: Duration,
    pub timestamp: String,
}

impl MetricsSnapshot {
    /// Fraction of utilization fetches that failed, 0.0 when none were made
    pub fn utilization_error_rate(&self) -> f64 {
        let total = self.utilization_fetched + self.utilization_failed;
        if total == 0 {
            0.0
        } else {
            self.utilization_failed as f64 / total as f64
        }
    }
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MetricsCollectorInner {
                counters: Counters::default(),
                last_run: None,
                start_time: Instant::now(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MetricsCollectorInner> {
        // Counters stay usable even if a holder panicked
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn record_token_exchange(&self) {
        self.lock().counters.token_exchanges += 1;
    }

    pub fn record_members_page(&self) {
        self.lock().counters.member_pages += 1;
    }

    pub fn record_utilization(&self, succeeded: bool) {
        let mut inner = self.lock();
        if succeeded {
            inner.counters.utilization_fetched += 1;
        } else {
            inner.counters.utilization_failed += 1;
        }
    }

    pub fn record_retry(&self) {
        self.lock().counters.retries += 1;
    }

    pub fn record_run(&self, run: RunMetrics) {
        let mut inner = self.lock();
        inner.counters.runs += 1;
        if !run.succeeded {
            inner.counters.failed_runs += 1;
        }
        inner.last_run = Some(run);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let inner = self.lock();
        let c = &inner.counters;

        MetricsSnapshot {
            runs: c.runs,
            failed_runs: c.failed_runs,
            token_exchanges: c.token_exchanges,
            member_pages: c.member_pages,
            utilization_fetched: c.utilization_fetched,
            utilization_failed: c.utilization_failed,
            retries: c.retries,
            last_run: inner.last_run.clone(),
            uptime: inner.start_time.elapsed(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
