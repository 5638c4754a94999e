use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tork_common::privacy::PiiMatch;

use super::GovernanceAction;
use crate::receipts::Receipt;

/// A detected match together with the action the policy resolved for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernedMatch {
    #[serde(flatten)]
    pub detected: PiiMatch,
    pub action: GovernanceAction,
}

/// What one governance call found.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PiiReport {
    /// Distinct detected types.
    pub types: BTreeSet<String>,
    pub count: usize,
    /// Matches in text order, never overlapping.
    pub matches: Vec<GovernedMatch>,
    pub redacted_text: String,
}

impl PiiReport {
    pub fn has_pii(&self) -> bool {
        self.count > 0
    }

    /// Number of matches of one type.
    pub fn count_of(&self, pii_type: &str) -> usize {
        self.matches.iter().filter(|m| m.detected.pii_type == pii_type).count()
    }
}

/// The outcome of a successful governance call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernanceResult {
    /// Most severe action applied, `allow` when nothing matched.
    pub action: GovernanceAction,
    pub output: String,
    pub pii: PiiReport,
    pub receipt: Receipt,
}
