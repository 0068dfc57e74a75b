//! End-to-end scan runs against the in-memory source.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use cwtally_scan::app::{dedupe, App};
use cwtally_scan::config::{self, ScanConfig};
use cwtally_scan::report;

use fake_source::{id, FakeSource};

#[tokio::test]
async fn listing_failure_issues_no_queries() {
    let src = Arc::new(
        FakeSource::new()
            .page(&[("A", "m1")])
            .page(&[("B", "m1")])
            .count("A", "m1", 5)
            .fail_page(1),
    );
    let app = App::new(ScanConfig::default(), src.clone());

    let err = app.run().await.expect_err("must fail");

    assert_eq!(err.code().as_str(), "LISTING_FAILED");
    assert_eq!(src.query_calls(), 0);
}

#[tokio::test]
async fn failed_query_still_produces_report() {
    let src = Arc::new(
        FakeSource::new()
            .page(&[("C", "m1")])
            .page(&[("D", "m1")])
            .fail("C", "m1", "access denied")
            .count("D", "m1", 10),
    );
    let app = App::new(ScanConfig::default(), src.clone());

    let totals = app.run().await.unwrap();

    assert_eq!(totals.len(), 1);
    assert_eq!(totals.get("D"), Some(10));
    assert_eq!(app.metrics().queries_with("failed"), 1);
    assert_eq!(
        report::render(&totals),
        "PutMetricData calls per namespace:\nD: 10 calls\n"
    );
}

#[tokio::test]
async fn every_listed_entry_is_queried_by_default() {
    // same metric listed under two dimension sets
    let src = Arc::new(FakeSource::new().page(&[("A", "m1"), ("A", "m1")]).count("A", "m1", 150));
    let app = App::new(ScanConfig::default(), src.clone());

    let totals = app.run().await.unwrap();

    assert_eq!(src.query_calls(), 2);
    assert_eq!(totals.get("A"), Some(300));
}

#[tokio::test]
async fn duplicate_listings_are_queried_once_when_dedupe_enabled() {
    let cfg = config::load_from_str(
        r#"
version: 1
scan:
  dedupe_identifiers: true
"#,
    )
    .unwrap();
    let src = Arc::new(
        FakeSource::new()
            .page(&[("A", "m1"), ("A", "m1")])
            .page(&[("B", "m1"), ("A", "m1")])
            .count("A", "m1", 150)
            .count("B", "m1", 50),
    );
    let app = App::new(cfg, src.clone());

    let totals = app.run().await.unwrap();

    assert_eq!(src.query_calls(), 2);
    assert_eq!(totals.get("A"), Some(150));
    assert_eq!(totals.get("B"), Some(50));
}

#[test]
fn dedupe_keeps_first_seen_order() {
    let ids = vec![id("B", "x"), id("A", "y"), id("B", "x"), id("A", "z"), id("A", "y")];
    assert_eq!(dedupe(ids), vec![id("B", "x"), id("A", "y"), id("A", "z")]);
}
