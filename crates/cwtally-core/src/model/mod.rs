//! Data model shared by the enumerator, the aggregator and the report.
//!
//! - `MetricIdentifier`: one listed metric stream, consumed exactly once.
//! - `QueryWindow`: the fixed time range and bucket width of every query.
//! - `QueryOutcome`: tagged per-identifier result; failures map to zero.
//! - `NamespaceTotals`: running sum per namespace, positive entries only.

pub mod identifier;
pub mod totals;
pub mod window;

pub use identifier::MetricIdentifier;
pub use totals::{NamespaceTotals, QueryOutcome, SampleCount};
pub use window::QueryWindow;
