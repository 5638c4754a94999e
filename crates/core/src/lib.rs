//! # Tork Core
//!
//! Governance layer over the `tork-common` privacy primitives.
//!
//! One [`Engine`] call detects PII in a text, resolves an action for every
//! match, rewrites the text and appends an audit [`Receipt`]:
//!
//! ```text
//! text -> Detector -> per-match action -> Redactor -> ReceiptGenerator -> GovernanceResult
//! ```
//!
//! ## Architecture Principles
//! - No I/O and no async: a governance call is synchronous and CPU-bound
//! - No process-wide state: every engine owns its registry, receipts and
//!   stats
//! - Engines are `Send + Sync`; the only lock guards the receipt append and
//!   stats update
//!
//! ## Example
//!
//! ```no_run
//! use tork_core::{Engine, GovernanceAction, TorkConfig};
//!
//! # fn main() -> tork_core::TorkResult<()> {
//! let config = TorkConfig::builder()
//!     .policy_version("2024.1")
//!     .custom_pattern("employee_id", r"EMP-\d{6}")
//!     .pattern_action("email", GovernanceAction::Hash)
//!     .build()?;
//! let engine = Engine::new(config)?;
//!
//! let result = engine.govern("ID is EMP-123456")?;
//! assert_eq!(result.output, "ID is [EMPLOYEE_ID_REDACTED]");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod errors;
pub mod governance;
pub mod receipts;
pub mod redaction;

pub use config::{CustomPattern, TorkConfig, TorkConfigBuilder};
pub use errors::{TorkError, TorkResult};
pub use governance::{
    governed, Engine, GovernOptions, GovernanceAction, GovernanceResult, GovernanceStats,
    GovernedMatch, PiiReport,
};
pub use receipts::{Direction, Receipt, ReceiptGenerator};
pub use redaction::Redactor;
