//! Query time window.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::{CwTallyError, Result};

/// Default look-back span: one hour.
pub const DEFAULT_SPAN: Duration = Duration::from_secs(3600);
/// Default aggregation bucket: ten minutes.
pub const DEFAULT_PERIOD: Duration = Duration::from_secs(600);

/// Half-open range `[start, end)` queried in buckets of `period`.
///
/// Built once per run and copied into every worker, so all identifiers are
/// measured over the same range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    start: SystemTime,
    end: SystemTime,
    period: Duration,
}

impl QueryWindow {
    pub fn new(start: SystemTime, end: SystemTime, period: Duration) -> Result<Self> {
        if end <= start {
            return Err(CwTallyError::Config("window end must be after start".into()));
        }
        if period.is_zero() {
            return Err(CwTallyError::Config("window period must be non-zero".into()));
        }
        Ok(Self { start, end, period })
    }

    /// `[now - span, now)`.
    pub fn trailing(span: Duration, period: Duration) -> Result<Self> {
        let end = SystemTime::now();
        let start = end.checked_sub(span).unwrap_or(UNIX_EPOCH);
        Self::new(start, end, period)
    }

    pub fn start(&self) -> SystemTime {
        self.start
    }

    pub fn end(&self) -> SystemTime {
        self.end
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Bucket width in whole seconds, as the remote API expects.
    pub fn period_secs(&self) -> u64 {
        self.period.as_secs()
    }

    pub fn span(&self) -> Duration {
        self.end.duration_since(self.start).unwrap_or_default()
    }
}
