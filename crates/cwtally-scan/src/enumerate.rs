//! Metric enumeration over the paginated listing endpoint.

use std::sync::Arc;

use futures_util::stream::{self, Stream, TryStreamExt};

use cwtally_core::error::{CwTallyError, Result};
use cwtally_core::model::MetricIdentifier;

use crate::obs::ScanMetrics;
use crate::source::MetricsSource;

enum Cursor {
    First,
    Next(String),
    Done,
}

/// Pages through `MetricsSource::list_page` until the service stops
/// returning a continuation token.
pub struct Enumerator {
    source: Arc<dyn MetricsSource>,
    metrics: Arc<ScanMetrics>,
}

impl Enumerator {
    pub fn new(source: Arc<dyn MetricsSource>, metrics: Arc<ScanMetrics>) -> Self {
        Self { source, metrics }
    }

    /// Lazy identifier stream. Every call starts again from the first page.
    ///
    /// A failed page is yielded as `Err(Listing)` and ends the stream; there
    /// is no partial-enumeration fallback.
    pub fn produce_identifiers(&self) -> impl Stream<Item = Result<MetricIdentifier>> + Send + 'static {
        let source = Arc::clone(&self.source);
        let metrics = Arc::clone(&self.metrics);

        stream::try_unfold(Cursor::First, move |cursor| {
            let source = Arc::clone(&source);
            let metrics = Arc::clone(&metrics);
            async move {
                let token = match cursor {
                    Cursor::Done => return Ok(None),
                    Cursor::First => None,
                    Cursor::Next(t) => Some(t),
                };

                let page = source.list_page(token).await?;
                metrics.listing_pages.inc(&[]);
                tracing::debug!(identifiers = page.identifiers.len(), "listing page fetched");

                let next = match page.next_token {
                    Some(t) if !t.is_empty() => Cursor::Next(t),
                    _ => Cursor::Done,
                };
                Ok::<_, CwTallyError>(Some((page.identifiers, next)))
            }
        })
        .map_ok(|ids| stream::iter(ids.into_iter().map(Ok::<_, CwTallyError>)))
        .try_flatten()
    }

    /// Drain the stream. The first listing error is returned as-is.
    pub async fn collect_all(&self) -> Result<Vec<MetricIdentifier>> {
        self.produce_identifiers().try_collect().await
    }
}
