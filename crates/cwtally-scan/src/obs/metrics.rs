//! Counter registry for a scan run.
//!
//! Labels are flattened into sorted key vectors to keep deterministic
//! ordering. `CounterVec` is backed by `DashMap` so workers can record
//! without a shared lock.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

fn label_key(labels: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut key: Vec<(String, String)> = labels.iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<Vec<(String, String)>, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self.map.entry(label_key(labels)).or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value; 0 for a label set never recorded.
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.value().load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Sum across every label set.
    pub fn sum(&self) -> u64 {
        self.map.iter().map(|r| r.value().load(Ordering::Relaxed)).sum()
    }

    /// Render as `name{k="v"} n` lines, sorted by label set.
    fn render(&self, name: &str, out: &mut String) {
        let mut rows: Vec<(String, u64)> = self.map.iter()
            .map(|r| {
                let label_str = r.key().iter()
                    .map(|(k, v)| format!("{}=\"{}\"", k, v))
                    .collect::<Vec<_>>().join(",");
                (label_str, r.value().load(Ordering::Relaxed))
            })
            .collect();
        rows.sort();
        for (label_str, val) in rows {
            let _ = writeln!(out, "{}{{{}}} {}", name, label_str, val);
        }
    }
}

/// Current and peak number of in-flight queries.
#[derive(Default)]
pub struct InFlightGauge {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl InFlightGauge {
    /// Count one query as in flight until the guard drops.
    pub fn track(&self) -> InFlightGuard<'_> {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        InFlightGuard { gauge: self }
    }

    pub fn current(&self) -> usize {
        self.current.load(Ordering::SeqCst)
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

pub struct InFlightGuard<'a> {
    gauge: &'a InFlightGauge,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.gauge.current.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Outcome labels for `ScanMetrics::queries`.
pub const OUTCOME_COUNTED: &str = "counted";
pub const OUTCOME_ZERO: &str = "zero";
pub const OUTCOME_FAILED: &str = "failed";
pub const OUTCOME_TIMEOUT: &str = "timeout";

#[derive(Default)]
pub struct ScanMetrics {
    /// Sample-count queries by `outcome`.
    pub queries: CounterVec,
    /// Listing pages fetched.
    pub listing_pages: CounterVec,
    pub in_flight: InFlightGauge,
}

impl ScanMetrics {
    pub fn queries_with(&self, outcome: &str) -> u64 {
        self.queries.get(&[("outcome", outcome)])
    }

    /// Render all counters plus the in-flight peak.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.listing_pages.render("cwtally_listing_pages_total", &mut out);
        self.queries.render("cwtally_queries_total", &mut out);
        let _ = writeln!(out, "cwtally_queries_in_flight_peak {}", self.in_flight.peak());
        out
    }
}
