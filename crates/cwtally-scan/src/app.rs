//! Scan orchestration: enumerate everything, then fan out queries.
//!
//! Enumeration finishes before the first query is issued, so a listing
//! failure aborts the run without paying for any sample-count query.

use std::collections::HashSet;
use std::sync::Arc;

use cwtally_core::error::Result;
use cwtally_core::model::{MetricIdentifier, NamespaceTotals, QueryWindow};

use crate::aggregate::Aggregator;
use crate::config::ScanConfig;
use crate::enumerate::Enumerator;
use crate::obs::ScanMetrics;
use crate::source::MetricsSource;

pub struct App {
    cfg: ScanConfig,
    source: Arc<dyn MetricsSource>,
    metrics: Arc<ScanMetrics>,
}

impl App {
    pub fn new(cfg: ScanConfig, source: Arc<dyn MetricsSource>) -> Self {
        Self {
            cfg,
            source,
            metrics: Arc::new(ScanMetrics::default()),
        }
    }

    pub fn metrics(&self) -> Arc<ScanMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn enumerator(&self) -> Enumerator {
        Enumerator::new(Arc::clone(&self.source), Arc::clone(&self.metrics))
    }

    pub fn aggregator(&self) -> Aggregator {
        let scan = &self.cfg.scan;
        Aggregator::new(
            Arc::clone(&self.source),
            scan.worker_limit,
            scan.query_timeout(),
            Arc::clone(&self.metrics),
        )
    }

    pub async fn run(&self) -> Result<NamespaceTotals> {
        let scan = &self.cfg.scan;

        let listed = self.enumerator().collect_all().await?;
        let listed_len = listed.len();
        let identifiers = if scan.dedupe_identifiers {
            dedupe(listed)
        } else {
            listed
        };

        // Each query below is a billed GetMetricStatistics call.
        tracing::info!(
            listed = listed_len,
            queries = identifiers.len(),
            worker_limit = scan.worker_limit,
            "enumeration complete, issuing sample count queries"
        );

        let window = QueryWindow::trailing(scan.window(), scan.period())?;
        let totals = self.aggregator().aggregate(identifiers, window).await;

        tracing::info!(
            namespaces = totals.len(),
            samples = totals.total(),
            failed = self.metrics.queries_with(crate::obs::metrics::OUTCOME_FAILED),
            timed_out = self.metrics.queries_with(crate::obs::metrics::OUTCOME_TIMEOUT),
            peak_in_flight = self.metrics.in_flight.peak(),
            "scan complete"
        );
        tracing::debug!("run counters:\n{}", self.metrics.render());

        Ok(totals)
    }
}

/// Drop repeated (namespace, metric name) pairs, keeping first-seen order.
pub fn dedupe(ids: Vec<MetricIdentifier>) -> Vec<MetricIdentifier> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}
