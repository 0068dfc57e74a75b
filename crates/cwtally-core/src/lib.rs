//! cwtally core: metric identifiers, query windows, namespace totals and errors.
//!
//! This crate defines the data model and error surface shared by the scanner
//! and its tests. It carries no runtime or remote-service dependencies so the
//! aggregation contract can be exercised without credentials.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `CwTallyError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod model;

/// Shared result type.
pub use error::{CwTallyError, ErrorCode, Result};
pub use model::{MetricIdentifier, NamespaceTotals, QueryOutcome, QueryWindow, SampleCount};
