//! Plain-text report.

use std::fmt::Write;

use cwtally_core::model::NamespaceTotals;

pub const HEADER: &str = "PutMetricData calls per namespace:";

/// Header line, then `"{namespace}: {count} calls"` per namespace, highest
/// count first.
pub fn render(totals: &NamespaceTotals) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{HEADER}");
    for (namespace, count) in totals.ranked() {
        let _ = writeln!(out, "{namespace}: {count} calls");
    }
    out
}
