//! Report formatting.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use cwtally_core::model::NamespaceTotals;
use cwtally_scan::report;
use cwtally_scan::source::sum_sample_counts;

#[test]
fn header_only_when_empty() {
    assert_eq!(report::render(&NamespaceTotals::new()), "PutMetricData calls per namespace:\n");
}

#[test]
fn highest_count_first() {
    let mut t = NamespaceTotals::new();
    t.record("A", 150);
    t.record("B", 50);
    t.record("Custom/Billing", 900);
    t.record("Zero", 0);

    let out = report::render(&t);
    assert_eq!(
        out,
        "PutMetricData calls per namespace:\n\
         Custom/Billing: 900 calls\n\
         A: 150 calls\n\
         B: 50 calls\n"
    );
}

#[test]
fn missing_bucket_counts_are_zero() {
    assert_eq!(sum_sample_counts([Some(60.0), None, Some(40.0)]), 100);
    assert_eq!(sum_sample_counts([None, None]), 0);
    assert_eq!(sum_sample_counts(Vec::<Option<f64>>::new()), 0);
    assert_eq!(sum_sample_counts([Some(0.4), Some(0.4)]), 1);
    assert_eq!(sum_sample_counts([Some(f64::NAN)]), 0);
}
