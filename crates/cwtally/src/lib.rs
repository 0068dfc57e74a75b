//! Top-level facade crate for cwtally.
//!
//! Re-exports the core model and the scanner library so users can depend on a single crate.

pub mod core {
    pub use cwtally_core::*;
}

pub mod scan {
    pub use cwtally_scan::*;
}
