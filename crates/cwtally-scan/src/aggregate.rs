//! Bounded fan-out of sample-count queries and the per-namespace fold.
//!
//! Scheduling is submit-as-slots-free: a new query task is spawned only once
//! fewer than `worker_limit` tasks remain unjoined, so the number of queries
//! in flight never exceeds the limit no matter how many identifiers there
//! are. Finished tasks are joined and folded by this one loop, which makes it
//! the only writer of `NamespaceTotals`.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use tokio::task::{JoinError, JoinSet};

use cwtally_core::error::CwTallyError;
use cwtally_core::model::{MetricIdentifier, NamespaceTotals, QueryOutcome, QueryWindow};

use crate::obs::metrics::{OUTCOME_COUNTED, OUTCOME_FAILED, OUTCOME_TIMEOUT, OUTCOME_ZERO};
use crate::obs::ScanMetrics;
use crate::source::MetricsSource;

pub struct Aggregator {
    source: Arc<dyn MetricsSource>,
    worker_limit: usize,
    query_timeout: Option<Duration>,
    metrics: Arc<ScanMetrics>,
}

impl Aggregator {
    /// `worker_limit` below 1 is treated as 1.
    pub fn new(
        source: Arc<dyn MetricsSource>,
        worker_limit: usize,
        query_timeout: Option<Duration>,
        metrics: Arc<ScanMetrics>,
    ) -> Self {
        Self {
            source,
            worker_limit: worker_limit.max(1),
            query_timeout,
            metrics,
        }
    }

    pub fn worker_limit(&self) -> usize {
        self.worker_limit
    }

    /// Query every identifier over `window` and sum positive results per
    /// namespace.
    ///
    /// Returns only after every identifier has resolved. Query failures and
    /// timeouts are logged and contribute zero; they never abort the run.
    pub async fn aggregate<I>(&self, identifiers: I, window: QueryWindow) -> NamespaceTotals
    where
        I: IntoIterator<Item = MetricIdentifier>,
    {
        let mut totals = NamespaceTotals::new();
        let mut workers: JoinSet<(MetricIdentifier, QueryOutcome)> = JoinSet::new();

        for id in identifiers {
            while workers.len() >= self.worker_limit {
                match workers.join_next().await {
                    Some(done) => self.fold(&mut totals, done),
                    None => break,
                }
            }

            let source = Arc::clone(&self.source);
            let metrics = Arc::clone(&self.metrics);
            let timeout = self.query_timeout;
            workers.spawn(async move {
                // A panicking source is contained here so the failure keeps its identifier.
                let outcome = AssertUnwindSafe(query_one(source.as_ref(), &id, &window, timeout, &metrics))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|_| {
                        QueryOutcome::Failed(CwTallyError::Internal("query worker panicked".into()))
                    });
                (id, outcome)
            });
        }

        while let Some(done) = workers.join_next().await {
            self.fold(&mut totals, done);
        }

        totals
    }

    fn fold(
        &self,
        totals: &mut NamespaceTotals,
        done: Result<(MetricIdentifier, QueryOutcome), JoinError>,
    ) {
        let (id, outcome) = match done {
            Ok(done) => done,
            Err(e) => {
                // Only reachable if the task is cancelled; panics are caught in the task.
                self.metrics.queries.inc(&[("outcome", OUTCOME_FAILED)]);
                tracing::error!(error = %e, "query worker aborted, counting as zero");
                return;
            }
        };

        let n = outcome.contribution();
        match &outcome {
            QueryOutcome::Counted(_) if n == 0 => {
                self.metrics.queries.inc(&[("outcome", OUTCOME_ZERO)]);
                tracing::trace!(namespace = %id.namespace(), metric = %id.metric_name(), "no samples");
            }
            QueryOutcome::Counted(_) => {
                self.metrics.queries.inc(&[("outcome", OUTCOME_COUNTED)]);
            }
            QueryOutcome::Failed(e) => {
                let label = match e {
                    CwTallyError::Timeout(_) => OUTCOME_TIMEOUT,
                    _ => OUTCOME_FAILED,
                };
                self.metrics.queries.inc(&[("outcome", label)]);
                if e.is_fatal() {
                    tracing::error!(
                        namespace = %id.namespace(),
                        metric = %id.metric_name(),
                        code = e.code().as_str(),
                        error = %e,
                        "sample count query crashed, counting as zero"
                    );
                } else {
                    tracing::warn!(
                        namespace = %id.namespace(),
                        metric = %id.metric_name(),
                        code = e.code().as_str(),
                        error = %e,
                        "sample count query failed, counting as zero"
                    );
                }
            }
        }
        totals.record(id.namespace(), n);
    }
}

async fn query_one(
    source: &dyn MetricsSource,
    id: &MetricIdentifier,
    window: &QueryWindow,
    timeout: Option<Duration>,
    metrics: &ScanMetrics,
) -> QueryOutcome {
    let _in_flight = metrics.in_flight.track();

    let res = match timeout {
        Some(limit) => match tokio::time::timeout(limit, source.sample_count(id, window)).await {
            Ok(r) => r,
            Err(_) => Err(CwTallyError::Timeout(limit)),
        },
        None => source.sample_count(id, window).await,
    };

    res.into()
}
