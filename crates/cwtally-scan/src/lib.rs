//! cwtally scanner library entry.
//!
//! Wires the listing enumerator, the bounded query fan-out, the CloudWatch
//! source, config loading and the report together. Consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod aggregate;
pub mod app;
pub mod config;
pub mod enumerate;
pub mod obs;
pub mod report;
pub mod source;
