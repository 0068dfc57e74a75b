//! Paginated enumeration.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::StreamExt;

use cwtally_core::error::{CwTallyError, Result};
use cwtally_core::model::{MetricIdentifier, QueryWindow, SampleCount};
use cwtally_scan::enumerate::Enumerator;
use cwtally_scan::obs::ScanMetrics;
use cwtally_scan::source::{MetricPage, MetricsSource};

use fake_source::{id, FakeSource};

fn enumerator(src: &Arc<FakeSource>) -> (Enumerator, Arc<ScanMetrics>) {
    let metrics = Arc::new(ScanMetrics::default());
    (Enumerator::new(src.clone(), Arc::clone(&metrics)), metrics)
}

#[tokio::test]
async fn concatenates_pages_in_order() {
    let src = Arc::new(
        FakeSource::new()
            .page(&[("A", "m1"), ("A", "m2")])
            .page(&[])
            .page(&[("B", "m1")]),
    );
    let (e, metrics) = enumerator(&src);

    let ids = e.collect_all().await.unwrap();

    assert_eq!(ids, vec![id("A", "m1"), id("A", "m2"), id("B", "m1")]);
    assert_eq!(src.list_calls(), 3);
    assert_eq!(metrics.listing_pages.sum(), 3);
}

#[tokio::test]
async fn each_call_restarts_from_first_page() {
    let src = Arc::new(FakeSource::new().page(&[("A", "m1")]).page(&[("B", "m1")]));
    let (e, _) = enumerator(&src);

    let first = e.collect_all().await.unwrap();
    let second = e.collect_all().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(src.list_calls(), 4);
}

#[tokio::test]
async fn stream_is_lazy() {
    let src = Arc::new(FakeSource::new().page(&[("A", "m1"), ("A", "m2")]).page(&[("B", "m1")]));
    let (e, _) = enumerator(&src);

    let stream = e.produce_identifiers();
    assert_eq!(src.list_calls(), 0);

    let mut stream = Box::pin(stream);
    let first = stream.next().await.unwrap().unwrap();
    assert_eq!(first, id("A", "m1"));
    assert_eq!(src.list_calls(), 1);
}

#[tokio::test]
async fn listing_failure_is_terminal() {
    let src = Arc::new(
        FakeSource::new()
            .page(&[("A", "m1")])
            .page(&[("B", "m1")])
            .page(&[("C", "m1")])
            .fail_page(1),
    );
    let (e, _) = enumerator(&src);

    let err = e.collect_all().await.expect_err("must fail");
    assert_eq!(err.code().as_str(), "LISTING_FAILED");
    assert!(err.is_fatal());
    // page 2 is never requested after the failure
    assert_eq!(src.list_calls(), 2);

    let items: Vec<Result<MetricIdentifier>> = e.produce_identifiers().collect().await;
    assert_eq!(items.len(), 2);
    assert!(items[0].is_ok());
    assert!(items[1].is_err());
}

/// Returns an empty continuation token on the only page.
#[derive(Default)]
struct EmptyTokenSource {
    calls: AtomicUsize,
}

#[async_trait]
impl MetricsSource for EmptyTokenSource {
    async fn list_page(&self, _next_token: Option<String>) -> Result<MetricPage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(MetricPage {
            identifiers: vec![id("A", "m1")],
            next_token: Some(String::new()),
        })
    }

    async fn sample_count(&self, _id: &MetricIdentifier, _w: &QueryWindow) -> Result<SampleCount> {
        Err(CwTallyError::Internal("not used".into()))
    }
}

#[tokio::test]
async fn empty_token_ends_pagination() {
    let src = Arc::new(EmptyTokenSource::default());
    let e = Enumerator::new(src.clone(), Arc::new(ScanMetrics::default()));

    let ids = e.collect_all().await.unwrap();

    assert_eq!(ids, vec![id("A", "m1")]);
    assert_eq!(src.calls.load(Ordering::SeqCst), 1);
}
