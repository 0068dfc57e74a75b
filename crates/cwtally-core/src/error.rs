//! Shared error type across cwtally crates.

use std::time::Duration;

use thiserror::Error;

/// Stable error codes used in log lines and exit reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid configuration value or file.
    Config,
    /// Unsupported config schema version.
    UnsupportedVersion,
    /// A listing page could not be fetched.
    ListingFailed,
    /// A single sample-count query failed.
    QueryFailed,
    /// A single sample-count query did not finish in time.
    Timeout,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Config => "CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::ListingFailed => "LISTING_FAILED",
            ErrorCode::QueryFailed => "QUERY_FAILED",
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, CwTallyError>;

/// Unified error type used by core and scan.
#[derive(Debug, Error)]
pub enum CwTallyError {
    #[error("invalid config: {0}")]
    Config(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("list metrics failed: {0}")]
    Listing(String),
    #[error("sample count query failed: {0}")]
    Query(String),
    #[error("sample count query timed out after {0:?}")]
    Timeout(Duration),
    #[error("internal: {0}")]
    Internal(String),
}

impl CwTallyError {
    /// Map error to a stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            CwTallyError::Config(_) => ErrorCode::Config,
            CwTallyError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            CwTallyError::Listing(_) => ErrorCode::ListingFailed,
            CwTallyError::Query(_) => ErrorCode::QueryFailed,
            CwTallyError::Timeout(_) => ErrorCode::Timeout,
            CwTallyError::Internal(_) => ErrorCode::Internal,
        }
    }

    /// Whether the error terminates the run.
    ///
    /// Query and timeout errors are always absorbed per identifier by the
    /// aggregator; everything else aborts with no report.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, CwTallyError::Query(_) | CwTallyError::Timeout(_))
    }
}
