//! CloudWatch-backed `MetricsSource`.
//!
//! Credentials and region come from the ambient default chain
//! (environment, profile, instance role). Every call here is billed:
//! `ListMetrics` per page and `GetMetricStatistics` per identifier.

use async_trait::async_trait;
use aws_sdk_cloudwatch::error::DisplayErrorContext;
use aws_sdk_cloudwatch::primitives::DateTime;
use aws_sdk_cloudwatch::types::Statistic;
use aws_sdk_cloudwatch::Client;

use cwtally_core::error::{CwTallyError, Result};
use cwtally_core::model::{MetricIdentifier, QueryWindow, SampleCount};

use super::{sum_sample_counts, MetricPage, MetricsSource};

#[derive(Clone)]
pub struct CloudWatchSource {
    client: Client,
}

impl CloudWatchSource {
    /// Build a client from the ambient AWS configuration.
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::with_client(Client::new(&config))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MetricsSource for CloudWatchSource {
    async fn list_page(&self, next_token: Option<String>) -> Result<MetricPage> {
        let out = self
            .client
            .list_metrics()
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| CwTallyError::Listing(DisplayErrorContext(&e).to_string()))?;

        let mut identifiers = Vec::with_capacity(out.metrics().len());
        for m in out.metrics() {
            match (m.namespace(), m.metric_name()) {
                (Some(ns), Some(name)) => identifiers.push(MetricIdentifier::new(ns, name)),
                _ => tracing::warn!(metric = ?m, "listed metric without namespace or name, skipped"),
            }
        }

        Ok(MetricPage {
            identifiers,
            next_token: out.next_token().map(str::to_string),
        })
    }

    async fn sample_count(&self, id: &MetricIdentifier, window: &QueryWindow) -> Result<SampleCount> {
        let period = i32::try_from(window.period_secs())
            .map_err(|_| CwTallyError::Config("period does not fit in i32 seconds".into()))?;

        let out = self
            .client
            .get_metric_statistics()
            .namespace(id.namespace())
            .metric_name(id.metric_name())
            .start_time(DateTime::from(window.start()))
            .end_time(DateTime::from(window.end()))
            .period(period)
            .statistics(Statistic::SampleCount)
            .send()
            .await
            .map_err(|e| CwTallyError::Query(DisplayErrorContext(&e).to_string()))?;

        Ok(sum_sample_counts(out.datapoints().iter().map(|dp| dp.sample_count())))
    }
}
