//! Lightweight in-process run counters.
//!
//! Query outcomes, listing pages and peak concurrency are tracked with
//! atomics and rendered into the end-of-run summary log line.

pub mod metrics;

pub use metrics::{CounterVec, InFlightGauge, InFlightGuard, ScanMetrics};
