use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::TorkError;

/// What happens to a detected span.
///
/// Variants are ordered by severity, so `max()` over the actions applied in
/// one call gives the call's overall action.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum GovernanceAction {
    /// Leave the span untouched.
    Allow,
    /// Replace the span with a salted pseudonym.
    Hash,
    /// Replace the span with the pattern's redaction token.
    #[default]
    Redact,
    /// Fail the whole call with a policy violation.
    Block,
}

impl GovernanceAction {
    pub const ALL: [GovernanceAction; 4] = [Self::Allow, Self::Hash, Self::Redact, Self::Block];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Hash => "hash",
            Self::Redact => "redact",
            Self::Block => "block",
        }
    }
}

impl fmt::Display for GovernanceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GovernanceAction {
    type Err = TorkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TorkError::config(format!("Unknown governance action: {}", s)))
    }
}
