//! Remote metrics service seam.
//!
//! The enumerator and aggregator only see `MetricsSource`; the CloudWatch
//! client lives behind it so tests can swap in an in-memory double.

pub mod cloudwatch;

use async_trait::async_trait;

use cwtally_core::error::Result;
use cwtally_core::model::{MetricIdentifier, QueryWindow, SampleCount};

pub use cloudwatch::CloudWatchSource;

/// One page of the listing endpoint.
#[derive(Debug, Clone, Default)]
pub struct MetricPage {
    pub identifiers: Vec<MetricIdentifier>,
    /// Continuation token; `None` or empty means this was the last page.
    pub next_token: Option<String>,
}

/// Read-only view of a remote metrics service.
///
/// Constructed once per process and shared by every worker as
/// `Arc<dyn MetricsSource>`; implementations must be safe to call
/// concurrently.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Fetch one listing page. `None` requests the first page.
    async fn list_page(&self, next_token: Option<String>) -> Result<MetricPage>;

    /// Sum of per-bucket sample counts for `id` over `window`.
    async fn sample_count(&self, id: &MetricIdentifier, window: &QueryWindow) -> Result<SampleCount>;
}

/// Sum per-bucket sample counts; a bucket without a value counts as zero.
///
/// The service reports counts as floats, the total is rounded to the nearest
/// integer and clamped at zero.
pub fn sum_sample_counts<I>(buckets: I) -> SampleCount
where
    I: IntoIterator<Item = Option<f64>>,
{
    let sum: f64 = buckets.into_iter().map(|v| v.unwrap_or(0.0)).sum();
    let rounded = sum.round();
    if rounded.is_finite() && rounded > 0.0 {
        // `as` saturates at u64::MAX
        rounded as SampleCount
    } else {
        0
    }
}
