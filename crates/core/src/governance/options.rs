use serde::{Deserialize, Serialize};

use super::GovernanceAction;
use crate::receipts::Direction;

/// Per-call overrides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernOptions {
    pub direction: Direction,
    /// Replaces the configured default action for this call. Pattern and
    /// category overrides still take precedence.
    pub default_action: Option<GovernanceAction>,
}

impl GovernOptions {
    pub fn input() -> Self {
        Self { direction: Direction::Input, default_action: None }
    }

    pub fn output() -> Self {
        Self { direction: Direction::Output, default_action: None }
    }

    pub fn with_default_action(mut self, action: GovernanceAction) -> Self {
        self.default_action = Some(action);
        self
    }
}
