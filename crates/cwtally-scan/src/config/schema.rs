use std::time::Duration;

use cwtally_core::error::{CwTallyError, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScanConfig {
    pub version: u32,

    #[serde(default)]
    pub scan: ScanSection,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            version: 1,
            scan: ScanSection::default(),
        }
    }
}

impl ScanConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(CwTallyError::UnsupportedVersion);
        }

        self.scan.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScanSection {
    /// Max sample-count queries in flight at once.
    #[serde(default = "default_worker_limit")]
    pub worker_limit: usize,

    /// Look-back span ending at "now".
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Bucket width passed to the query call.
    #[serde(default = "default_period_secs")]
    pub period_secs: u64,

    /// Per-query timeout; `null` waits forever.
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: Option<u64>,

    /// Query each (namespace, metric name) pair once even when it is listed
    /// under several dimension sets. Off by default: every listed entry is
    /// queried and counted.
    #[serde(default = "default_dedupe_identifiers")]
    pub dedupe_identifiers: bool,
}

impl Default for ScanSection {
    fn default() -> Self {
        Self {
            worker_limit: default_worker_limit(),
            window_secs: default_window_secs(),
            period_secs: default_period_secs(),
            query_timeout_ms: default_query_timeout_ms(),
            dedupe_identifiers: default_dedupe_identifiers(),
        }
    }
}

impl ScanSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=256).contains(&self.worker_limit) {
            return Err(CwTallyError::Config(
                "scan.worker_limit must be between 1 and 256".into(),
            ));
        }
        if self.period_secs == 0 || self.period_secs % 60 != 0 {
            return Err(CwTallyError::Config(
                "scan.period_secs must be a positive multiple of 60".into(),
            ));
        }
        if self.period_secs > 86400 {
            return Err(CwTallyError::Config(
                "scan.period_secs must be at most 86400".into(),
            ));
        }
        if self.window_secs < self.period_secs {
            return Err(CwTallyError::Config(
                "scan.window_secs must be at least period_secs".into(),
            ));
        }
        if let Some(ms) = self.query_timeout_ms {
            if !(1000..=600000).contains(&ms) {
                return Err(CwTallyError::Config(
                    "scan.query_timeout_ms must be between 1000 and 600000".into(),
                ));
            }
        }
        Ok(())
    }

    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    pub fn period(&self) -> Duration {
        Duration::from_secs(self.period_secs)
    }

    pub fn query_timeout(&self) -> Option<Duration> {
        self.query_timeout_ms.map(Duration::from_millis)
    }
}

fn default_worker_limit() -> usize {
    10
}
fn default_window_secs() -> u64 {
    3600
}
fn default_period_secs() -> u64 {
    600
}
fn default_query_timeout_ms() -> Option<u64> {
    Some(60000)
}
fn default_dedupe_identifiers() -> bool {
    false
}
