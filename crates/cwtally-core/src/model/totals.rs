//! Per-namespace totals and the per-identifier outcome folded into them.

use std::collections::BTreeMap;

use crate::error::CwTallyError;

/// Ingested data points for one identifier over the query window.
pub type SampleCount = u64;

/// Result of querying one identifier.
///
/// Failures are carried as values so the aggregator maps them to zero
/// deterministically instead of catching them at an arbitrary call site.
#[derive(Debug)]
pub enum QueryOutcome {
    Counted(SampleCount),
    Failed(CwTallyError),
}

impl QueryOutcome {
    /// Amount this outcome adds to its namespace total.
    pub fn contribution(&self) -> SampleCount {
        match self {
            QueryOutcome::Counted(n) => *n,
            QueryOutcome::Failed(_) => 0,
        }
    }
}

impl From<crate::Result<SampleCount>> for QueryOutcome {
    fn from(r: crate::Result<SampleCount>) -> Self {
        match r {
            Ok(n) => QueryOutcome::Counted(n),
            Err(e) => QueryOutcome::Failed(e),
        }
    }
}

/// Namespace -> accumulated sample count.
///
/// Only strictly positive totals are ever stored: recording zero is a no-op,
/// so a namespace whose identifiers all returned zero never appears.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceTotals {
    map: BTreeMap<String, SampleCount>,
}

impl NamespaceTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` to `namespace`. Zero is discarded.
    pub fn record(&mut self, namespace: &str, count: SampleCount) {
        if count == 0 {
            return;
        }
        match self.map.get_mut(namespace) {
            Some(total) => *total = total.saturating_add(count),
            None => {
                self.map.insert(namespace.to_string(), count);
            }
        }
    }

    pub fn get(&self, namespace: &str) -> Option<SampleCount> {
        self.map.get(namespace).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Entries ordered by namespace name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, SampleCount)> + '_ {
        self.map.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Sum over all namespaces.
    pub fn total(&self) -> SampleCount {
        self.map.values().fold(0, |acc, v| acc.saturating_add(*v))
    }

    /// Entries by descending count, ties broken by namespace name.
    pub fn ranked(&self) -> Vec<(&str, SampleCount)> {
        let mut v: Vec<_> = self.iter().collect();
        v.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        v
    }
}
