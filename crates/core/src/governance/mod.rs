//! Governance orchestration
//!
//! [`Engine`] runs detection, resolves a [`GovernanceAction`] for each match,
//! rewrites the text and issues a receipt. Actions resolve most specific
//! first:
//!
//! 1. `pattern_actions[pattern id]`
//! 2. `category_actions[category]`
//! 3. [`GovernOptions::default_action`] for the call, when set
//! 4. `TorkConfig::default_action`

mod action;
mod engine;
mod options;
mod result;
mod stats;
mod wrap;

pub use action::GovernanceAction;
pub use engine::Engine;
pub use options::GovernOptions;
pub use result::{GovernanceResult, GovernedMatch, PiiReport};
pub use stats::GovernanceStats;
pub use wrap::governed;
