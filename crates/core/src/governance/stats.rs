use std::collections::BTreeMap;

use serde::Serialize;

use super::{GovernanceAction, PiiReport};

/// Counters accumulated by one engine since creation or the last reset.
///
/// Blocked calls produce no result and are not counted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GovernanceStats {
    pub total_calls: u64,
    pub calls_with_pii: u64,
    pub total_pii_instances: u64,
    pub pii_by_type: BTreeMap<String, u64>,
    pub action_counts: BTreeMap<GovernanceAction, u64>,
    pub total_processing_ns: u64,
}

impl GovernanceStats {
    pub fn avg_processing_time_ns(&self) -> u64 {
        if self.total_calls == 0 {
            0
        } else {
            self.total_processing_ns / self.total_calls
        }
    }

    /// Counters for a single call.
    pub(crate) fn for_call(report: &PiiReport, action: GovernanceAction, elapsed_ns: u64) -> Self {
        let mut pii_by_type = BTreeMap::new();
        for m in &report.matches {
            *pii_by_type.entry(m.detected.pii_type.clone()).or_default() += 1;
        }
        Self {
            total_calls: 1,
            calls_with_pii: u64::from(report.has_pii()),
            total_pii_instances: report.count as u64,
            pii_by_type,
            action_counts: BTreeMap::from([(action, 1)]),
            total_processing_ns: elapsed_ns,
        }
    }

    /// Adds `other` into `self`. Cost is bounded by the number of distinct
    /// types, not by the size of the governed text.
    pub(crate) fn merge(&mut self, other: &Self) {
        self.total_calls += other.total_calls;
        self.calls_with_pii += other.calls_with_pii;
        self.total_pii_instances += other.total_pii_instances;
        for (pii_type, count) in &other.pii_by_type {
            *self.pii_by_type.entry(pii_type.clone()).or_default() += count;
        }
        for (action, count) in &other.action_counts {
            *self.action_counts.entry(*action).or_default() += count;
        }
        self.total_processing_ns =
            self.total_processing_ns.saturating_add(other.total_processing_ns);
    }
}
